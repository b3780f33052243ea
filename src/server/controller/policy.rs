use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{api::ErrorDto, policy::GuildPolicyDto},
    server::{
        data::guild_policy::GuildPolicyRepository, error::AppError,
        service::policy::admin::PolicyAdminService, state::AppState,
    },
};

/// Tag for grouping policy endpoints in OpenAPI documentation
pub static POLICY_TAG: &str = "policy";

/// Get a guild's command policy.
///
/// Returns the guild mode and every channel rule in configuration order. A guild
/// that was never configured returns the unrestricted default policy.
///
/// # Arguments
/// - `state` - Application state containing the database connection
/// - `guild_id` - Discord guild ID to fetch the policy for
///
/// # Returns
/// - `200 OK` - The guild's current policy
/// - `503 Service Unavailable` - The policy store could not be reached
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/guilds/{guild_id}/policy",
    tag = POLICY_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Successfully retrieved guild policy", body = GuildPolicyDto),
        (status = 503, description = "Policy store unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_guild_policy(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let store = GuildPolicyRepository::new(&state.db, state.store_timeout);
    let service = PolicyAdminService::new(&store, &state.catalog);

    let policy = service.list_channel_rules(guild_id).await?;

    Ok((StatusCode::OK, Json(policy.into_dto(guild_id))))
}
