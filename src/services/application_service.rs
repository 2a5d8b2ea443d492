use std::sync::Arc;

use uuid::Uuid;

use crate::dto::application_dto::{
    ApplicationFilter, ApplicationList, ApplicationListQuery, ApplicationStats,
    ApplicationSubmission, DEFAULT_LIMIT, DEFAULT_PAGE,
};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::store::ApplicationStore;
use validator::{Validate, ValidationError, ValidationErrors};

/// Intake and review operations over an [`ApplicationStore`].
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn ApplicationStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }

    /// Validates, runs the duplicate pre-flight, then writes a PENDING record.
    pub async fn submit(&self, submission: ApplicationSubmission) -> Result<Application> {
        let draft = submission.normalize()?;

        if let Some(existing) = self
            .store
            .find_duplicate(&draft.contact_number, &draft.legal_name)
            .await?
        {
            tracing::info!(existing_id = %existing.id, "duplicate application refused");
            return Err(Error::Conflict(
                "An application with this name or contact number already exists".to_string(),
            ));
        }

        let application = self.store.create(draft).await?;
        tracing::info!(
            application_id = %application.id,
            role = %application.role,
            "application submitted"
        );
        Ok(application)
    }

    pub async fn list(&self, query: ApplicationListQuery) -> Result<ApplicationList> {
        query.validate()?;
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| page_out_of_range(page))?;

        let filter = ApplicationFilter {
            status: query.status,
            role: query.role,
            search,
            offset,
            limit,
        };
        let (items, total) = self.store.list(&filter).await?;
        let total_pages = (total + limit - 1) / limit;

        Ok(ApplicationList {
            items,
            total,
            page,
            limit,
            total_pages,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Application> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    /// Moves a PENDING application to APPROVED or REJECTED; every other edge is refused.
    pub async fn transition_status(
        &self,
        id: Uuid,
        target: ApplicationStatus,
    ) -> Result<Application> {
        let current = self.get(id).await?;
        current.status.ensure_transition(target)?;

        let updated = self.store.update_status(id, current.status, target).await?;
        tracing::info!(
            application_id = %id,
            from = %current.status,
            to = %updated.status,
            "application status changed"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!(application_id = %id, "application deleted");
        Ok(())
    }

    pub async fn stats(&self) -> Result<ApplicationStats> {
        let (total, pending, approved, rejected, by_role) = tokio::try_join!(
            self.store.count(None),
            self.store.count(Some(ApplicationStatus::Pending)),
            self.store.count(Some(ApplicationStatus::Approved)),
            self.store.count(Some(ApplicationStatus::Rejected)),
            self.store.group_count_by_role(),
        )?;

        Ok(ApplicationStats {
            total,
            pending,
            approved,
            rejected,
            by_role,
        })
    }
}

fn page_out_of_range(page: i64) -> Error {
    let mut err = ValidationError::new("range");
    err.message = Some("Page is too large".into());
    err.add_param("value".into(), &page);
    let mut errors = ValidationErrors::new();
    errors.add("page", err);
    Error::Validation(errors)
}
