use crate::error::ServerResult;
use crate::routes::read_upload;
use crate::state::ServerState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Recognition result
#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub text: String,
    pub confidence: u8,
}

/// Recognize an uploaded captcha
pub async fn recognize(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<impl IntoResponse> {
    let bytes = read_upload(multipart).await?;
    let recognition = state
        .run_blocking(move |recognizer| recognizer.recognize_bytes(&bytes))
        .await?;

    tracing::info!(
        text = %recognition.text,
        confidence = recognition.confidence,
        "captcha recognized"
    );
    Ok(Json(OcrResponse {
        text: recognition.text,
        confidence: recognition.confidence,
    }))
}
