use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A bot command as listed by `GET /api/commands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommandDto {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub description: String,
    pub moderator_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommandListDto {
    pub commands: Vec<CommandDto>,
}
