//! Axum route handlers for the Negotiation API.

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::MAX_NEGOTIATION_ROUNDS;
use crate::document::export_redline_docx;
use crate::errors::AppError;
use crate::negotiation::driver::NegotiationBrief;
use crate::negotiation::redline::{redline, Redline};
use crate::negotiation::{negotiate, NegotiationOutcome, RoundRecord};
use crate::routes::docx_attachment;
use crate::session::load_or_new;
use crate::sow::handlers::SessionQuery;
use crate::state::AppState;

const REDLINE_FILE_NAME: &str = "Clause_Redline.docx";
/// Longest clause accepted for negotiation, in characters.
pub const MAX_CLAUSE_CHARS: usize = 20_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NegotiationRequest {
    pub session_id: Option<Uuid>,
    pub clause_text: String,
    pub buyer_objectives: String,
    pub supplier_objectives: String,
    /// Defaults to the configured round count.
    pub rounds: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct NegotiationResponse {
    pub session_id: Uuid,
    pub transcript: Vec<RoundRecord>,
    pub final_clause: String,
    pub score: u32,
    pub reasons: Vec<String>,
    pub redline: String,
    pub clause_changed: bool,
    pub similarity: f64,
}

impl NegotiationResponse {
    fn new(session_id: Uuid, outcome: &NegotiationOutcome) -> Self {
        let diff = outcome_redline(outcome);
        Self {
            session_id,
            transcript: outcome.transcript.clone(),
            final_clause: outcome.final_clause.clone(),
            score: outcome.score.score,
            reasons: outcome.score.reasons.clone(),
            redline: diff.to_marked_text(),
            clause_changed: diff.has_changes(),
            similarity: diff.similarity(),
        }
    }
}

fn outcome_redline(outcome: &NegotiationOutcome) -> Redline {
    redline(&outcome.clause_text, &outcome.final_clause)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/negotiation/run
///
/// Runs a full negotiation, arbitration and scoring pass. On success the
/// outcome replaces any earlier negotiation in the session.
pub async fn handle_run(
    State(state): State<AppState>,
    Json(request): Json<NegotiationRequest>,
) -> Result<Json<NegotiationResponse>, AppError> {
    for (field, value) in [
        ("clause_text", &request.clause_text),
        ("buyer_objectives", &request.buyer_objectives),
        ("supplier_objectives", &request.supplier_objectives),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }

    if request.clause_text.chars().count() > MAX_CLAUSE_CHARS {
        return Err(AppError::Validation(format!(
            "clause_text must be at most {MAX_CLAUSE_CHARS} characters"
        )));
    }

    let rounds = request.rounds.unwrap_or(state.config.negotiation_rounds);
    if rounds == 0 || rounds > MAX_NEGOTIATION_ROUNDS {
        return Err(AppError::Validation(format!(
            "rounds must be between 1 and {MAX_NEGOTIATION_ROUNDS}"
        )));
    }

    let outcome = negotiate(
        state.llm.as_ref(),
        &state.config.model,
        NegotiationBrief {
            clause_text: request.clause_text.trim(),
            buyer_objectives: request.buyer_objectives.trim(),
            supplier_objectives: request.supplier_objectives.trim(),
        },
        rounds,
    )
    .await?;

    let (session_id, mut session) = load_or_new(state.sessions.as_ref(), request.session_id).await?;
    let response = NegotiationResponse::new(session_id, &outcome);
    session.negotiation = Some(outcome);
    state.sessions.put(session_id, session).await?;

    info!("Session {session_id}: negotiation outcome stored ({rounds} rounds)");
    Ok(Json(response))
}

/// GET /api/v1/negotiation/redline?session_id=
///
/// Downloads the redline of the session's latest completed negotiation.
pub async fn handle_redline(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, AppError> {
    let outcome = state
        .sessions
        .get(query.session_id)
        .await?
        .and_then(|s| s.negotiation)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No completed negotiation in session {}",
                query.session_id
            ))
        })?;

    let path = tokio::task::spawn_blocking(move || {
        export_redline_docx(&outcome_redline(&outcome), &outcome.final_clause)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    docx_attachment(path, REDLINE_FILE_NAME).await
}
