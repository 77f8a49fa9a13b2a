use anyhow::Context;
use todo_service::{app, config::Config, db, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing().map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;

    let config = Config::from_env()?;

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect(url).await.context("Error connecting DB")?;
            AppState::postgres(pool, &config)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, todos are kept in memory only");
            AppState::in_memory(&config)
        }
    };

    let app = app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;

    tracing::info!(addr = %config.addr(), "server is chilling");

    axum::serve(listener, app).await?;
    Ok(())
}
