use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationListResponse, ApplicationResponse, ApplicationStats,
        ApplicationSubmission, DeleteApplicationResponse, UpdateStatusPayload,
    },
    error::{Error, Result},
    models::application::{ApplicationStatus, Role},
    AppState,
};

fn invalid_body(rejection: JsonRejection) -> Error {
    Error::BadRequest(format!("Invalid data provided: {}", rejection.body_text()))
}

fn application_id(path: std::result::Result<Path<Uuid>, PathRejection>) -> Result<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| Error::NotFound("Application not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplicationSubmission,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "An application with this name or contact number already exists")
    )
)]
pub async fn create_application(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ApplicationSubmission>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(submission) = payload.map_err(invalid_body)?;
    let application = state.application_service.submit(submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, 1 to 100"),
        ("status" = Option<ApplicationStatus>, Query, description = "Filter by review status"),
        ("role" = Option<Role>, Query, description = "Filter by role"),
        ("search" = Option<String>, Query, description = "Match name, email or contact number")
    ),
    responses(
        (status = 200, description = "Page of applications", body = ApplicationListResponse),
        (status = 401, description = "Missing or invalid admin token")
    ),
    security(("admin_token" = []))
)]
pub async fn list_applications(
    State(state): State<AppState>,
    query: std::result::Result<Query<ApplicationListQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query.map_err(|e| Error::BadRequest(e.body_text()))?;
    let result = state.application_service.list(query).await?;
    Ok(Json(ApplicationListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = ApplicationResponse),
        (status = 404, description = "Application not found")
    ),
    security(("admin_token" = []))
)]
pub async fn get_application(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse> {
    let id = application_id(path)?;
    let application = state.application_service.get(id).await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application is no longer pending")
    ),
    security(("admin_token" = []))
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateStatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = application_id(path)?;
    let Json(payload) = payload.map_err(invalid_body)?;
    let target = payload.target()?;
    let application = state
        .application_service
        .transition_status(id, target)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application deleted", body = DeleteApplicationResponse),
        (status = 404, description = "Application not found")
    ),
    security(("admin_token" = []))
)]
pub async fn delete_application(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse> {
    let id = application_id(path)?;
    state.application_service.delete(id).await?;
    Ok(Json(DeleteApplicationResponse {
        message: "Application deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/applications/stats",
    responses(
        (status = 200, description = "Counts by status and role", body = ApplicationStats)
    ),
    security(("admin_token" = []))
)]
pub async fn application_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.application_service.stats().await?;
    Ok(Json(stats))
}
