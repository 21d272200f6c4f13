use anyhow::bail;
use clap::Subcommand;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::Result;
use crate::ocr::OcrProvider;

use super::open_database;

#[derive(Debug, Subcommand)]
pub enum ApiCommand {
    /// Start the HTTP API server
    Serve,
    /// Check that a running server answers its health endpoint
    Healthz,
}

pub(super) async fn run(
    cmd: ApiCommand,
    config: Config,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    match cmd {
        ApiCommand::Serve => serve(config, shutdown).await,
        ApiCommand::Healthz => {
            let base = format!("http://{}:{}", config.server.host, config.server.port);
            let status = probe_health(&base).await?;
            println!("{status}");
            if !status.is_success() {
                bail!("server at {base} is not healthy");
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, shutdown: CancellationToken) -> anyhow::Result<()> {
    tracing::info!("Initializing database...");
    let db = open_database(&config).await?;

    tracing::info!(languages = %config.ocr.languages, "Initializing OCR provider...");
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - image uploads will be rejected");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config, db, ocr));

    tracing::info!("wcrack starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/healthz", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `GET {base_url}/api/v1/healthz`, returning the response status.
pub async fn probe_health(base_url: &str) -> Result<StatusCode> {
    let url = format!("{}/api/v1/healthz", base_url.trim_end_matches('/'));
    tracing::info!(url = %url, "Sending request");

    let response = reqwest::Client::new().get(&url).send().await?;
    let status = response.status();
    match status {
        StatusCode::OK => tracing::info!(status = %status, "Server OK"),
        StatusCode::NOT_FOUND => tracing::warn!(status = %status, "Health endpoint not found"),
        _ => tracing::warn!(status = %status, "Unexpected health response"),
    }
    Ok(status)
}
