//! Web server exposing document text extraction.
//!
//! - `GET /health` is open
//! - `GET /process-document` requires the configured API key

mod auth;
mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::ocr::{OcrBackend, TesseractBackend};
use crate::services::DocumentProcessor;

/// Shared state for the web server.
///
/// Everything here is immutable after startup; per-request state lives in
/// the handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http: HttpClient,
    pub processor: Arc<DocumentProcessor>,
}

impl AppState {
    /// Build state backed by the Tesseract toolchain.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let backend = TesseractBackend::new(settings.ocr_language.clone());
        if !backend.is_available() {
            tracing::warn!("{}", backend.availability_hint());
        }
        Self::with_backend(settings, Arc::new(backend))
    }

    /// Build state around an arbitrary OCR backend.
    pub fn with_backend(settings: Settings, backend: Arc<dyn OcrBackend>) -> anyhow::Result<Self> {
        let mut builder = HttpClient::builder(settings.download_timeout, settings.max_download_bytes);
        if let Some(ref ua) = settings.user_agent {
            builder = builder.user_agent(ua);
        }
        let http = builder.build()?;
        Ok(Self::from_parts(settings, http, backend))
    }

    pub fn from_parts(settings: Settings, http: HttpClient, backend: Arc<dyn OcrBackend>) -> Self {
        let processor = DocumentProcessor::new(backend).with_page_cap(settings.page_cap);
        Self {
            settings: Arc::new(settings),
            http,
            processor: Arc::new(processor),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: Settings, bind: &str) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = bind.parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
