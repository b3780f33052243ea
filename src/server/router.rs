use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    model::{
        api::{ErrorDto, StatusDto},
        command::{CommandDto, CommandListDto},
        policy::{ChannelRuleDto, GuildPolicyDto},
    },
    server::{
        controller::{
            command::{self, get_commands},
            policy::{self, get_guild_policy},
            status::{self, get_status},
        },
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(status::get_status, command::get_commands, policy::get_guild_policy),
    components(schemas(
        ErrorDto,
        StatusDto,
        CommandDto,
        CommandListDto,
        GuildPolicyDto,
        ChannelRuleDto
    )),
    tags(
        (name = "status", description = "Service health"),
        (name = "command", description = "Registered bot commands"),
        (name = "policy", description = "Per-guild command policies")
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/commands", get(get_commands))
        .route("/api/guilds/{guild_id}/policy", get(get_guild_policy))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}
