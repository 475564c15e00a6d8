//! Negotiation scoring: deterministic keyword heuristic, no LLM call.
//!
//! Algorithm:
//! 1. Objective terms: lower-cased alphanumeric words (≥ 4 chars, no stop words)
//!    from the buyer objectives, deduplicated in order.
//! 2. Coverage: share of terms present in the final buyer reply → up to 80 points.
//! 3. Momentum: share of terms the final supplier reply acknowledges → up to 20 points.
//! 4. Resistance: −5 per round whose supplier reply contains a refusal marker.
//! 5. Clamp to 0 – 100.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::negotiation::RoundRecord;

const COVERAGE_WEIGHT: f64 = 80.0;
const MOMENTUM_WEIGHT: f64 = 20.0;
const RESISTANCE_PENALTY: f64 = 5.0;
const MIN_TERM_LEN: usize = 4;
const MAX_LISTED_TERMS: usize = 5;

const REFUSAL_MARKERS: [&str; 5] = ["cannot", "reject", "unable", "not acceptable", "decline"];

const STOP_WORDS: [&str; 24] = [
    "that", "this", "with", "from", "have", "will", "shall", "should", "would", "must", "their",
    "there", "they", "them", "than", "then", "into", "onto", "also", "such", "each", "other",
    "which", "where",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationScore {
    pub score: u32, // 0 – 100
    pub reasons: Vec<String>,
}

pub fn score_negotiation(transcript: &[RoundRecord], buyer_objectives: &str) -> NegotiationScore {
    let terms = objective_terms(buyer_objectives);

    if terms.is_empty() {
        return NegotiationScore {
            score: 0,
            reasons: vec!["No scorable buyer objectives were provided.".to_string()],
        };
    }

    let Some(last) = transcript.last() else {
        return NegotiationScore {
            score: 0,
            reasons: vec!["No negotiation rounds were recorded.".to_string()],
        };
    };

    let buyer_words = word_set(&last.buyer);
    let supplier_words = word_set(&last.supplier);

    let (covered, missing): (Vec<&String>, Vec<&String>) =
        terms.iter().partition(|t| buyer_words.contains(t.as_str()));
    let acknowledged = terms
        .iter()
        .filter(|t| supplier_words.contains(t.as_str()))
        .count();
    let resisted_rounds = transcript
        .iter()
        .filter(|r| contains_refusal(&r.supplier))
        .count();

    let total = terms.len() as f64;
    let raw = (covered.len() as f64 / total) * COVERAGE_WEIGHT
        + (acknowledged as f64 / total) * MOMENTUM_WEIGHT
        - resisted_rounds as f64 * RESISTANCE_PENALTY;
    let score = raw.clamp(0.0, 100.0).round() as u32;

    let mut reasons = Vec::new();
    if !covered.is_empty() {
        reasons.push(format!(
            "Buyer's final position covers {}/{} objective terms: {}.",
            covered.len(),
            terms.len(),
            list_terms(&covered)
        ));
    }
    if !missing.is_empty() {
        reasons.push(format!(
            "Objective terms absent from the final position: {}.",
            list_terms(&missing)
        ));
    }
    reasons.push(format!(
        "Supplier's final reply acknowledges {acknowledged}/{} objective terms.",
        terms.len()
    ));
    if resisted_rounds > 0 {
        reasons.push(format!(
            "Supplier pushed back explicitly in {resisted_rounds} of {} rounds.",
            transcript.len()
        ));
    }
    reasons.push(summary(score));

    NegotiationScore { score, reasons }
}

fn objective_terms(objectives: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    words(objectives)
        .filter(|w| w.chars().count() >= MIN_TERM_LEN && !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn word_set(text: &str) -> HashSet<String> {
    words(text).collect()
}

fn contains_refusal(text: &str) -> bool {
    let lower = text.to_lowercase();
    REFUSAL_MARKERS.iter().any(|m| lower.contains(m))
}

fn list_terms(terms: &[&String]) -> String {
    terms
        .iter()
        .take(MAX_LISTED_TERMS)
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary(score: u32) -> String {
    if score >= 75 {
        format!("Strong outcome for the buyer ({score}/100).")
    } else if score >= 50 {
        format!("Moderate outcome for the buyer ({score}/100); some objectives were traded away.")
    } else {
        format!("Weak outcome for the buyer ({score}/100); most objectives did not survive the negotiation.")
    }
}
