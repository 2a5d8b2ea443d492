use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Internship track an applicant is applying for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
    utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "internship_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    VideoEditor,
    ContentWriter,
    WebDeveloper,
    GraphicDesigner,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::VideoEditor,
        Role::ContentWriter,
        Role::WebDeveloper,
        Role::GraphicDesigner,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::VideoEditor => "VIDEO_EDITOR",
            Role::ContentWriter => "CONTENT_WRITER",
            Role::WebDeveloper => "WEB_DEVELOPER",
            Role::GraphicDesigner => "GRAPHIC_DESIGNER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::BadRequest("Please select a valid role".to_string()))
    }
}

/// Review state of an application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// APPROVED and REJECTED are terminal.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    /// Only PENDING -> APPROVED and PENDING -> REJECTED are legal edges.
    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
        )
    }

    pub fn ensure_transition(self, next: ApplicationStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::BadRequest("Invalid status value".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
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

/// Normalized, validated submission ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub legal_name: String,
    pub email: String,
    pub contact_number: String,
    pub resume_link: String,
    pub role: Role,
    pub justification: String,
}

impl NewApplication {
    /// Materializes the stored shape: fresh id, PENDING, both timestamps equal.
    pub fn into_record(self, now: DateTime<Utc>) -> Application {
        Application {
            id: Uuid::new_v4(),
            legal_name: self.legal_name,
            email: self.email,
            contact_number: self.contact_number,
            resume_link: self.resume_link,
            role: self.role,
            justification: self.justification,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
