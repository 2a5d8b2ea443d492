use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus, NewApplication, Role};
use crate::utils::validation::{
    strip_whitespace, validate_contact_number, validate_legal_name, validate_not_blank,
    validate_resume_link, validate_role, validate_status,
};

/// Raw intake form body. Every field is checked and all failures are reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationSubmission {
    #[validate(
        length(
            min = 2,
            max = 100,
            message = "Legal name must be between 2 and 100 characters"
        ),
        custom(function = "validate_legal_name")
    )]
    pub legal_name: String,
    #[validate(
        email(message = "Please enter a valid email address"),
        length(
            min = 5,
            max = 100,
            message = "Email must be between 5 and 100 characters"
        )
    )]
    pub email: String,
    #[validate(custom(function = "validate_contact_number"))]
    pub contact_number: String,
    #[validate(
        url(message = "Please enter a valid URL for your resume"),
        custom(function = "validate_resume_link")
    )]
    pub resume_link: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
    #[validate(
        length(
            min = 50,
            max = 1000,
            message = "Justification must be between 50 and 1000 characters"
        ),
        custom(function = "validate_not_blank")
    )]
    pub justification: String,
}

impl ApplicationSubmission {
    /// Validates every field, then lowercases the email and strips whitespace from the phone.
    pub fn normalize(self) -> Result<NewApplication> {
        self.validate()?;
        let role: Role = self.role.parse()?;
        Ok(NewApplication {
            legal_name: self.legal_name,
            email: self.email.to_lowercase(),
            contact_number: strip_whitespace(&self.contact_number),
            resume_link: self.resume_link,
            role,
            justification: self.justification,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub struct UpdateStatusPayload {
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

impl UpdateStatusPayload {
    pub fn target(&self) -> Result<ApplicationStatus> {
        self.validate()?;
        self.status.parse()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApplicationListQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub status: Option<ApplicationStatus>,
    pub role: Option<Role>,
    pub search: Option<String>,
}

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Store-level selection derived from a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub role: Option<Role>,
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        if self.status.is_some_and(|s| s != application.status) {
            return false;
        }
        if self.role.is_some_and(|r| r != application.role) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                application.legal_name.to_lowercase().contains(&needle)
                    || application.email.to_lowercase().contains(&needle)
                    || application.contact_number.contains(term.as_str())
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub legal_name: String,
    pub email: String,
    pub contact_number: String,
    pub resume_link: String,
    pub role: Role,
    pub justification: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            legal_name: value.legal_name,
            email: value.email,
            contact_number: value.contact_number,
            resume_link: value.resume_link,
            role: value.role,
            justification: value.justification,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug)]
pub struct ApplicationList {
    pub items: Vec<Application>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListResponse {
    pub items: Vec<ApplicationResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl From<ApplicationList> for ApplicationListResponse {
    fn from(value: ApplicationList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            limit: value.limit,
            total_pages: value.total_pages,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub by_role: BTreeMap<Role, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteApplicationResponse {
    pub message: String,
}
