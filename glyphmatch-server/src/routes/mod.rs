//! API route handlers
//!
//! - `health`: liveness
//! - `ocr`: captcha recognition
//! - `templates`: template creation and reload

pub mod health;
pub mod ocr;
pub mod templates;

use crate::error::{ServerError, ServerResult};
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Multipart field carrying the captcha image
const UPLOAD_FIELD: &str = "file";

/// Root status check. `HEAD /` is answered by the same route.
pub async fn root() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// Pull the uploaded image out of a multipart body
pub(crate) async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Bytes> {
    let mut multipart = multipart
        .map_err(|err| ServerError::BadRequest(format!("Malformed upload: {}", err.body_text())))?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Err(ServerError::BadRequest(format!(
        "Missing multipart field '{UPLOAD_FIELD}'."
    )))
}
