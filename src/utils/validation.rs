use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use validator::ValidationError;

use crate::models::application::{ApplicationStatus, Role};

pub const ALLOWED_RESUME_DOMAINS: [&str; 7] = [
    "drive.google.com",
    "dropbox.com",
    "onedrive.live.com",
    "github.com",
    "linkedin.com",
    "docdroid.net",
    "scribd.com",
];

pub const ALLOWED_RESUME_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

static LEGAL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("legal name pattern"));

static CONTACT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("contact number pattern"));

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_legal_name(value: &str) -> Result<(), ValidationError> {
    if LEGAL_NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(failure(
            "legal_name_charset",
            "Legal name can only contain letters, spaces, hyphens, and apostrophes",
        ))
    }
}

pub fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
    if CONTACT_NUMBER_RE.is_match(value) {
        Ok(())
    } else {
        Err(failure(
            "contact_number",
            "Please enter a valid contact number with at least 10 digits",
        ))
    }
}

/// Accepts links hosted on a known sharing service or pointing at a document file.
pub fn is_allowed_resume_link(value: &str) -> bool {
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    let hostname = url.host_str().unwrap_or_default().to_lowercase();
    let pathname = url.path().to_lowercase();

    let allowed_domain = ALLOWED_RESUME_DOMAINS
        .iter()
        .any(|domain| hostname.contains(domain));
    let allowed_extension = ALLOWED_RESUME_EXTENSIONS
        .iter()
        .any(|ext| pathname.ends_with(ext));

    allowed_domain || allowed_extension
}

pub fn validate_resume_link(value: &str) -> Result<(), ValidationError> {
    if is_allowed_resume_link(value) {
        Ok(())
    } else {
        Err(failure(
            "resume_link_source",
            "Please provide a link from a supported platform (Google Drive, Dropbox, OneDrive, etc.) or a direct PDF/DOC link",
        ))
    }
}

pub fn validate_role(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(failure("role_required", "Please select a role"));
    }
    match value.parse::<Role>() {
        Ok(_) => Ok(()),
        Err(_) => Err(failure("role_invalid", "Please select a valid role")),
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("blank", "Justification cannot be empty"))
    } else {
        Ok(())
    }
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(failure("status_required", "Status is required"));
    }
    match value.parse::<ApplicationStatus>() {
        Ok(_) => Ok(()),
        Err(_) => Err(failure("status_invalid", "Invalid status value")),
    }
}

pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
