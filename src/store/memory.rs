use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ApplicationStore;
use crate::dto::application_dto::ApplicationFilter;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication, Role};

/// Process-local store. One write lock covers the uniqueness check and the insert.
#[derive(Debug, Default)]
pub struct MemoryApplicationStore {
    records: RwLock<Vec<Application>>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn not_found() -> Error {
    Error::NotFound("Application not found".to_string())
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|a| a.id == id).cloned())
    }

    async fn find_duplicate(
        &self,
        contact_number: &str,
        legal_name: &str,
    ) -> Result<Option<Application>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|a| a.contact_number == contact_number || a.legal_name == legal_name)
            .cloned())
    }

    async fn list(&self, filter: &ApplicationFilter) -> Result<(Vec<Application>, i64)> {
        let records = self.records.read().await;
        let mut matching: Vec<&Application> =
            records.iter().filter(|a| filter.matches(a)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(0);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn create(&self, draft: NewApplication) -> Result<Application> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|a| a.contact_number == draft.contact_number || a.legal_name == draft.legal_name)
        {
            return Err(Error::Conflict(
                "An application with this name or contact number already exists".to_string(),
            ));
        }
        let record = draft.into_record(Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application> {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|a| a.id == id).ok_or_else(not_found)?;
        if record.status != from {
            return Err(Error::InvalidTransition {
                from: record.status,
                to,
            });
        }
        record.status = to;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|a| a.id != id);
        if records.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn count(&self, status: Option<ApplicationStatus>) -> Result<i64> {
        let records = self.records.read().await;
        let count = match status {
            Some(status) => records.iter().filter(|a| a.status == status).count(),
            None => records.len(),
        };
        Ok(count as i64)
    }

    async fn group_count_by_role(&self) -> Result<BTreeMap<Role, i64>> {
        let records = self.records.read().await;
        let mut counts = BTreeMap::new();
        for record in records.iter() {
            *counts.entry(record.role).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
