use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::model::api::StatusDto;

/// Tag for grouping status endpoints in OpenAPI documentation
pub static STATUS_TAG: &str = "status";

/// Liveness check.
///
/// # Returns
/// - `200 OK` - The API is serving requests
#[utoipa::path(
    get,
    path = "/api/status",
    tag = STATUS_TAG,
    responses(
        (status = 200, description = "API is running", body = StatusDto)
    ),
)]
pub async fn get_status() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatusDto {
            status: "ok".to_string(),
        }),
    )
}
