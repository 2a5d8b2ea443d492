//! Persistence boundary for application records.
//!
//! Both backends enforce legal-name and contact-number uniqueness themselves, so the
//! service-level duplicate check is only a pre-flight.

pub mod memory;
pub mod postgres;

use std::collections::BTreeMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::application_dto::ApplicationFilter;
use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus, NewApplication, Role};

pub use memory::MemoryApplicationStore;
pub use postgres::PgApplicationStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>>;

    /// First record sharing the contact number OR the legal name.
    async fn find_duplicate(
        &self,
        contact_number: &str,
        legal_name: &str,
    ) -> Result<Option<Application>>;

    /// Page of matching records, newest first, plus the unpaged match count.
    async fn list(&self, filter: &ApplicationFilter) -> Result<(Vec<Application>, i64)>;

    /// Fails with `Error::Conflict` when the identity is already taken.
    async fn create(&self, draft: NewApplication) -> Result<Application>;

    /// Sets `to` only while the record is still in `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn count(&self, status: Option<ApplicationStatus>) -> Result<i64>;

    async fn group_count_by_role(&self) -> Result<BTreeMap<Role, i64>>;
}
