// Clause negotiation simulator.
// Implements: alternating supplier/buyer rounds, arbitration, heuristic scoring, redline.
// All LLM calls go through llm_client; no direct HTTP calls to the completion endpoint here.

pub mod arbiter;
pub mod driver;
pub mod handlers;
pub mod prompts;
pub mod redline;
pub mod scoring;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ModelSettings;
use crate::errors::AppError;
use crate::llm_client::Completion;
use arbiter::arbitrate;
use driver::{run_negotiation, NegotiationBrief};
use scoring::{score_negotiation, NegotiationScore};

/// One supplier/buyer exchange. `round` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub supplier: String,
    pub buyer: String,
}

/// A completed negotiation. Replaces any previous outcome in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    pub clause_text: String,
    pub buyer_objectives: String,
    pub supplier_objectives: String,
    pub transcript: Vec<RoundRecord>,
    pub final_clause: String,
    pub score: NegotiationScore,
    pub completed_at: DateTime<Utc>,
}

/// Runs the rounds, arbitrates a final clause and scores the result.
/// Nothing is returned unless every step succeeded.
pub async fn negotiate(
    llm: &dyn Completion,
    settings: &ModelSettings,
    brief: NegotiationBrief<'_>,
    rounds: u32,
) -> Result<NegotiationOutcome, AppError> {
    let transcript = run_negotiation(llm, settings, brief, rounds).await?;
    let final_clause = arbitrate(llm, settings, brief.clause_text, &transcript).await?;
    let score = score_negotiation(&transcript, brief.buyer_objectives);
    info!("Negotiation scored {}/100", score.score);

    Ok(NegotiationOutcome {
        clause_text: brief.clause_text.to_string(),
        buyer_objectives: brief.buyer_objectives.to_string(),
        supplier_objectives: brief.supplier_objectives.to_string(),
        transcript,
        final_clause,
        score,
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{model_settings, FlakyCompletion, RecordingCompletion};

    fn brief() -> NegotiationBrief<'static> {
        NegotiationBrief {
            clause_text: "Payment is due within 60 days of invoice.",
            buyer_objectives: "Payment within 90 days",
            supplier_objectives: "Payment within 30 days",
        }
    }

    #[tokio::test]
    async fn test_negotiate_arbitrates_after_last_round() {
        let llm = RecordingCompletion::replying([
            "S1: 30 days",
            "B1: 90 days",
            "  Payment is due within 45 days of invoice.  ",
        ]);
        let outcome = negotiate(&llm, &model_settings(), brief(), 1).await.unwrap();

        assert_eq!(outcome.transcript.len(), 1);
        assert_eq!(outcome.final_clause, "Payment is due within 45 days of invoice.");
        assert!(outcome.score.score <= 100);

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[2].contains("S1: 30 days"));
        assert!(prompts[2].contains("B1: 90 days"));
    }

    #[tokio::test]
    async fn test_negotiate_fails_if_arbitration_fails() {
        let llm = FlakyCompletion::failing_after(4);
        let result = negotiate(&llm, &model_settings(), brief(), 2).await;
        assert!(matches!(result, Err(AppError::Completion(_))));
    }
}
