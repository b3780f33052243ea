mod model;
mod server;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::server::{
    bot::{self, command::registry},
    config::Config,
    error::AppError,
    router,
    service::catalog::CommandCatalog,
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let catalog = Arc::new(CommandCatalog::new(registry::command_specs())?);

    tracing::info!("Starting server");

    // Initialize Discord bot
    let bot_client = bot::start::init_bot(&config, db.clone(), catalog.clone()).await?;

    // Start Discord bot in a separate task
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let listener = TcpListener::bind(config.api_addr).await?;
    tracing::info!("Policy API listening on {}", config.api_addr);

    let app = router::router().with_state(AppState::new(db, catalog, config.store_timeout));
    axum::serve(listener, app).await?;

    Ok(())
}
