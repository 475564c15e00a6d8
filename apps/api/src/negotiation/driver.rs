//! Negotiation Round Driver: alternating supplier/buyer turns.
//!
//! Round `i + 1`'s supplier prompt depends on round `i`'s buyer reply, so
//! rounds run strictly in sequence. A failed completion aborts the whole run.

use tracing::{debug, info};

use crate::config::ModelSettings;
use crate::errors::AppError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::Completion;
use crate::negotiation::prompts::{BUYER_TURN_TEMPLATE, OPENING_ROUND_NOTE, SUPPLIER_TURN_TEMPLATE};
use crate::negotiation::RoundRecord;

/// Inputs that stay fixed for every round of one negotiation.
#[derive(Debug, Clone, Copy)]
pub struct NegotiationBrief<'a> {
    pub clause_text: &'a str,
    pub buyer_objectives: &'a str,
    pub supplier_objectives: &'a str,
}

pub fn supplier_turn_prompt(
    brief: &NegotiationBrief<'_>,
    round: u32,
    buyer_position: Option<&str>,
) -> String {
    let round = round.to_string();
    fill_template(
        SUPPLIER_TURN_TEMPLATE,
        &[
            ("round", &round),
            ("clause_text", brief.clause_text),
            ("supplier_objectives", brief.supplier_objectives),
            ("buyer_position", buyer_position.unwrap_or(OPENING_ROUND_NOTE)),
        ],
    )
}

pub fn buyer_turn_prompt(
    brief: &NegotiationBrief<'_>,
    round: u32,
    supplier_position: &str,
) -> String {
    let round = round.to_string();
    fill_template(
        BUYER_TURN_TEMPLATE,
        &[
            ("round", &round),
            ("clause_text", brief.clause_text),
            ("buyer_objectives", brief.buyer_objectives),
            ("supplier_position", supplier_position),
        ],
    )
}

/// Runs `round_count` rounds and returns the full transcript.
pub async fn run_negotiation(
    llm: &dyn Completion,
    settings: &ModelSettings,
    brief: NegotiationBrief<'_>,
    round_count: u32,
) -> Result<Vec<RoundRecord>, AppError> {
    let mut transcript: Vec<RoundRecord> = Vec::with_capacity(round_count as usize);

    for round in 1..=round_count {
        let previous_buyer = transcript.last().map(|r| r.buyer.as_str());

        let prompt = supplier_turn_prompt(&brief, round, previous_buyer);
        let supplier = llm
            .complete(&prompt, &settings.model, settings.temperature)
            .await?;
        debug!("Round {round}: supplier replied ({} chars)", supplier.len());

        let prompt = buyer_turn_prompt(&brief, round, &supplier);
        let buyer = llm
            .complete(&prompt, &settings.model, settings.temperature)
            .await?;
        debug!("Round {round}: buyer replied ({} chars)", buyer.len());

        transcript.push(RoundRecord {
            round,
            supplier,
            buyer,
        });
    }

    info!("Negotiation finished after {} rounds", transcript.len());
    Ok(transcript)
}
