pub mod health;

use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::warn;

use crate::document::DOCX_MIME;
use crate::errors::AppError;
use crate::negotiation::handlers as negotiation;
use crate::sow::handlers as sow;
use crate::state::AppState;

/// Uploads larger than this are rejected before extraction.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Statement of Work
        .route("/api/v1/sow/generate", post(sow::handle_generate))
        .route("/api/v1/sow/refine", post(sow::handle_refine))
        .route("/api/v1/sow/export", get(sow::handle_export))
        // Negotiation
        .route("/api/v1/negotiation/run", post(negotiation::handle_run))
        .route("/api/v1/negotiation/redline", get(negotiation::handle_redline))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Streams an exported DOCX back as a download and removes the temporary file.
pub(crate) async fn docx_attachment(path: PathBuf, file_name: &str) -> Result<Response, AppError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to read export {}: {e}",
                path.display()
            ))
        })?;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Could not remove temporary export {}: {e}", path.display());
    }

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
