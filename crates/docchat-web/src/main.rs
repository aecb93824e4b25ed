use std::sync::Arc;

use docchat_core::{AppConfig, Controller, GeminiBackend, SessionSettings};
use docchat_web::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    if config.api_key.is_empty() {
        tracing::warn!("no API key configured; enter one in the page's settings panel");
    }

    let backend = Arc::new(GeminiBackend::new(
        reqwest::Client::new(),
        config.api_base.clone(),
    ));
    let controller = Controller::new(
        backend,
        SessionSettings {
            model: config.model,
            api_key: config.api_key.clone(),
        },
    );
    let state = Arc::new(AppState::new(controller));

    let max_upload_bytes = usize::try_from(config.max_upload_mb.saturating_mul(1024 * 1024))?;
    let app = docchat_web::router(state, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, model = %config.model, "listening");
    println!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
