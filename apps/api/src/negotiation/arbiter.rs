//! Arbiter: folds a finished transcript into one final-clause prompt.

use crate::config::ModelSettings;
use crate::errors::AppError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::Completion;
use crate::negotiation::prompts::ARBITRATION_TEMPLATE;
use crate::negotiation::RoundRecord;

/// Renders the transcript as numbered supplier/buyer exchanges.
pub fn format_transcript(transcript: &[RoundRecord]) -> String {
    transcript
        .iter()
        .map(|r| {
            format!(
                "Round {round}\nSupplier:\n{supplier}\n\nBuyer:\n{buyer}",
                round = r.round,
                supplier = r.supplier.trim(),
                buyer = r.buyer.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pure: the same transcript always yields the same prompt.
pub fn final_arbitration_prompt(clause_text: &str, transcript: &[RoundRecord]) -> String {
    fill_template(
        ARBITRATION_TEMPLATE,
        &[
            ("clause_text", clause_text),
            ("transcript", &format_transcript(transcript)),
        ],
    )
}

/// Asks the completion backend for the arbitrated clause.
pub async fn arbitrate(
    llm: &dyn Completion,
    settings: &ModelSettings,
    clause_text: &str,
    transcript: &[RoundRecord],
) -> Result<String, AppError> {
    let prompt = final_arbitration_prompt(clause_text, transcript);
    let clause = llm
        .complete(&prompt, &settings.model, settings.temperature)
        .await?;
    Ok(clause.trim().to_string())
}
