use std::sync::Arc;

use anyhow::Context;
use todo_api::{
    create_router,
    repository::{self, PgTodoRepository},
    server::run,
    telemetry::init_tracing,
    AppState, Config,
};

// Entry point of the application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    let pool = repository::connect(&config)
        .await
        .context("failed to connect to the database")?;
    tracing::info!("connected to database {} on {}", config.db_name, config.db_host);

    repository::ensure_schema(&pool)
        .await
        .context("failed to create the todos table")?;

    let app_state = Arc::new(AppState::new(Arc::new(PgTodoRepository::new(pool))));
    let app = create_router(app_state);

    run(app, &config).await?;
    Ok(())
}
