use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{model::command::CommandListDto, server::state::AppState};

/// Tag for grouping command endpoints in OpenAPI documentation
pub static COMMAND_TAG: &str = "command";

/// List every registered bot command.
///
/// Returns the command catalog in help order, including aliases and whether the
/// command is restricted to moderators.
///
/// # Arguments
/// - `state` - Application state containing the command catalog
///
/// # Returns
/// - `200 OK` - All registered commands
#[utoipa::path(
    get,
    path = "/api/commands",
    tag = COMMAND_TAG,
    responses(
        (status = 200, description = "Successfully retrieved commands", body = CommandListDto)
    ),
)]
pub async fn get_commands(State(state): State<AppState>) -> impl IntoResponse {
    let commands = state
        .catalog
        .commands()
        .iter()
        .map(|command| command.to_dto())
        .collect();

    (StatusCode::OK, Json(CommandListDto { commands }))
}
