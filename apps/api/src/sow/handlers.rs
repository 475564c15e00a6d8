//! Axum route handlers for the Statement of Work API.

use axum::{
    extract::{Multipart, Query, State},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::document::{export_docx, extract_upload, DocumentFormat};
use crate::errors::AppError;
use crate::render::markdown_to_html;
use crate::routes::docx_attachment;
use crate::session::{load_or_new, SowContext};
use crate::sow::workflow::{generate_sow, refine_sow, SowRequest};
use crate::state::AppState;

const EXPORT_HEADING: &str = "Generated Statement of Work";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub session_id: Uuid,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub session_id: Uuid,
    pub draft: String,
    pub draft_html: String,
    pub revision: u32,
    pub clause_count: usize,
}

impl DraftResponse {
    fn new(session_id: Uuid, ctx: &SowContext) -> Self {
        Self {
            session_id,
            draft: ctx.draft.clone(),
            draft_html: markdown_to_html(&ctx.draft),
            revision: ctx.revision,
            clause_count: ctx.clauses.len(),
        }
    }
}

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

#[derive(Default)]
struct GenerateForm {
    file: Option<UploadedFile>,
    description: Option<String>,
    custom_clauses: Option<String>,
    reference_url: Option<String>,
    session_id: Option<Uuid>,
}

async fn read_generate_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();
    let bad_field = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Malformed upload: {e}"))
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_field)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_field)?;
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "description" => form.description = Some(field.text().await.map_err(bad_field)?),
            "custom_clauses" => form.custom_clauses = Some(field.text().await.map_err(bad_field)?),
            "reference_url" => form.reference_url = Some(field.text().await.map_err(bad_field)?),
            "session_id" => {
                let raw = field.text().await.map_err(bad_field)?;
                if !raw.trim().is_empty() {
                    let id = raw.trim().parse::<Uuid>().map_err(|_| {
                        AppError::Validation(format!("session_id '{raw}' is not a valid UUID"))
                    })?;
                    form.session_id = Some(id);
                }
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sow/generate
///
/// Multipart form: `file` (PDF or DOCX), `description`, optional `custom_clauses`,
/// `reference_url` and `session_id`. Replaces the session's SoW context on success.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DraftResponse>, AppError> {
    let form = read_generate_form(multipart).await?;

    let (file, description) = match (form.file, form.description) {
        (Some(file), Some(desc)) if !file.bytes.is_empty() && !desc.trim().is_empty() => {
            (file, desc)
        }
        _ => {
            return Err(AppError::Validation(
                "Please upload a document and provide a description.".to_string(),
            ))
        }
    };

    let format = DocumentFormat::from_upload(file.file_name.as_deref(), file.content_type.as_deref())
        .ok_or_else(|| {
            AppError::Validation("Only PDF and DOCX uploads are supported.".to_string())
        })?;

    let source_text = extract_upload(file.bytes, format).await?;

    let context = generate_sow(
        state.llm.as_ref(),
        &state.config.model,
        state.references.as_ref(),
        &state.http,
        SowRequest {
            source_text,
            user_description: description,
            custom_clauses: form.custom_clauses,
            reference_url: form.reference_url,
        },
    )
    .await?;

    let (session_id, mut session) = load_or_new(state.sessions.as_ref(), form.session_id).await?;
    let response = DraftResponse::new(session_id, &context);
    session.sow = Some(context);
    state.sessions.put(session_id, session).await?;

    info!("Session {session_id}: new SoW draft stored");
    Ok(Json(response))
}

/// POST /api/v1/sow/refine
///
/// Revises the session's current draft with the user's feedback.
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let current = state
        .sessions
        .get(request.session_id)
        .await?
        .and_then(|s| s.sow)
        .ok_or_else(|| not_found_draft(request.session_id))?;

    let refined = refine_sow(
        state.llm.as_ref(),
        &state.config.model,
        &current,
        &request.feedback,
    )
    .await?;

    // Reload so a negotiation stored while the completion ran is kept.
    let (_, mut session) = load_or_new(state.sessions.as_ref(), Some(request.session_id)).await?;
    let response = DraftResponse::new(request.session_id, &refined);
    session.sow = Some(refined);
    state.sessions.put(request.session_id, session).await?;

    info!(
        "Session {}: SoW refined to revision {}",
        request.session_id, response.revision
    );
    Ok(Json(response))
}

/// GET /api/v1/sow/export?session_id=
///
/// Downloads the current draft as DOCX.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, AppError> {
    let ctx = state
        .sessions
        .get(query.session_id)
        .await?
        .and_then(|s| s.sow)
        .ok_or_else(|| not_found_draft(query.session_id))?;

    let file_name = export_file_name(ctx.revision);
    let path = tokio::task::spawn_blocking(move || export_docx(EXPORT_HEADING, &ctx.draft))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    docx_attachment(path, file_name).await
}

fn export_file_name(revision: u32) -> &'static str {
    if revision == 0 {
        "Statement_of_Work.docx"
    } else {
        "Refined_Statement_of_Work.docx"
    }
}

fn not_found_draft(session_id: Uuid) -> AppError {
    AppError::NotFound(format!(
        "No Statement of Work has been generated in session {session_id}"
    ))
}
