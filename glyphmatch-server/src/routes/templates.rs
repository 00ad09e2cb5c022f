use crate::error::{ServerError, ServerResult};
use crate::routes::read_upload;
use crate::state::ServerState;
use axum::extract::rejection::QueryRejection;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use glyphmatch::Label;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for template creation
#[derive(Debug, Deserialize)]
pub struct AddTemplateQuery {
    /// One character per glyph, left to right
    pub label: String,
}

/// Response from template creation
#[derive(Debug, Serialize)]
pub struct AddTemplateResponse {
    pub message: String,
    pub files: Vec<String>,
}

/// Response from a template reload
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub templates: usize,
    pub labels: usize,
}

/// Label an uploaded captcha and store its glyphs as templates
pub async fn add_template(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<AddTemplateQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<impl IntoResponse> {
    let Query(query) = query
        .map_err(|_| ServerError::BadRequest("Query parameter 'label' is required.".into()))?;
    // Reject bad labels before reading the upload.
    Label::parse_str(&query.label)?;

    let bytes = read_upload(multipart).await?;
    let label = query.label;
    let files = state
        .run_blocking(move |recognizer| recognizer.add_templates_bytes(&label, &bytes))
        .await?;

    tracing::info!(files = files.len(), "templates saved");
    Ok(Json(AddTemplateResponse {
        message: "Templates saved.".to_string(),
        files,
    }))
}

/// Rescan the template directory
pub async fn reload_templates(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let report = state.run_blocking(|recognizer| recognizer.reload()).await?;

    tracing::info!(
        templates = report.templates,
        labels = report.labels,
        skipped = report.skipped,
        "templates reloaded"
    );
    Ok(Json(ReloadResponse {
        message: "Templates reloaded".to_string(),
        templates: report.templates,
        labels: report.labels,
    }))
}
