use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::dto::application_dto::{
    ApplicationListResponse, ApplicationResponse, ApplicationStats, ApplicationSubmission,
    DeleteApplicationResponse, UpdateStatusPayload,
};
use crate::error::FieldError;
use crate::models::application::{ApplicationStatus, Role};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::application::create_application,
        crate::routes::application::list_applications,
        crate::routes::application::get_application,
        crate::routes::application::update_application_status,
        crate::routes::application::delete_application,
        crate::routes::application::application_stats,
    ),
    components(schemas(
        ApplicationSubmission,
        UpdateStatusPayload,
        ApplicationResponse,
        ApplicationListResponse,
        ApplicationStats,
        DeleteApplicationResponse,
        FieldError,
        ApplicationStatus,
        Role,
    )),
    modifiers(&AdminTokenScheme),
    tags((name = "applications", description = "Internship application intake and review"))
)]
pub struct ApiDoc;

struct AdminTokenScheme;

impl Modify for AdminTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
