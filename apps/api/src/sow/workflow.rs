//! SoW workflow: generate a first draft, then refine it against feedback.
//!
//! Flow (generate): collect reference clauses → build initial prompt → complete.
//! Flow (refine):   build refine prompt from the stored draft + feedback → complete.
//!
//! Both return a complete new `SowContext`; persisting it is the caller's job,
//! so a failure at any step leaves the stored session untouched.

use chrono::Utc;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::ModelSettings;
use crate::errors::AppError;
use crate::llm_client::Completion;
use crate::references::{collect_clauses, ReferenceSource};
use crate::session::SowContext;
use crate::sow::builder::{build_prompt, PromptInput};
use crate::sow::prompts::SECTION_LABELS;

/// Inputs of an initial generation, after document extraction.
#[derive(Debug, Clone)]
pub struct SowRequest {
    pub source_text: String,
    pub user_description: String,
    pub custom_clauses: Option<String>,
    pub reference_url: Option<String>,
}

/// Collects reference clauses and drafts the first Statement of Work.
pub async fn generate_sow(
    llm: &dyn Completion,
    settings: &ModelSettings,
    references: &dyn ReferenceSource,
    http: &Client,
    request: SowRequest,
) -> Result<SowContext, AppError> {
    if request.user_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide a description of the goods/services.".to_string(),
        ));
    }

    let clauses = collect_clauses(
        references,
        http,
        request.custom_clauses.as_deref(),
        request.reference_url.as_deref(),
    )
    .await?;
    info!("Collected {} reference clauses", clauses.len());

    let prompt = build_prompt(PromptInput::Initial {
        source_text: &request.source_text,
        user_description: &request.user_description,
        clauses: &clauses,
    });
    let draft = llm
        .complete(&prompt, &settings.model, settings.temperature)
        .await?;
    info!("Generated SoW draft ({} chars)", draft.len());
    warn_missing_sections(&draft);

    Ok(SowContext {
        source_text: request.source_text,
        user_description: request.user_description,
        clauses,
        draft,
        revision: 0,
        updated_at: Utc::now(),
    })
}

/// Revises the current draft. Source text and clauses carry over unchanged.
pub async fn refine_sow(
    llm: &dyn Completion,
    settings: &ModelSettings,
    context: &SowContext,
    feedback: &str,
) -> Result<SowContext, AppError> {
    if feedback.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide feedback to refine the SoW.".to_string(),
        ));
    }

    let prompt = build_prompt(PromptInput::Refine {
        prior_draft: &context.draft,
        feedback,
    });
    let draft = llm
        .complete(&prompt, &settings.model, settings.temperature)
        .await?;
    info!(
        "Refined SoW to revision {} ({} chars)",
        context.revision + 1,
        draft.len()
    );
    warn_missing_sections(&draft);

    Ok(context.refined(draft))
}

/// Section labels that never appear in the draft (case-insensitive).
pub fn missing_sections(draft: &str) -> Vec<&'static str> {
    let lower = draft.to_lowercase();
    SECTION_LABELS
        .iter()
        .copied()
        .filter(|label| !lower.contains(&label.to_lowercase()))
        .collect()
}

fn warn_missing_sections(draft: &str) {
    let missing = missing_sections(draft);
    if !missing.is_empty() {
        warn!("Draft is missing SoW sections: {}", missing.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::{StaticReferenceSource, URL_ERROR_PREFIX};
    use crate::test_support::{model_settings, FailingCompletion, RecordingCompletion};

    fn request() -> SowRequest {
        SowRequest {
            source_text: "Vendor shall deliver X by Q3.".to_string(),
            user_description: "Cloud migration services".to_string(),
            custom_clauses: Some("Pasted clause".to_string()),
            reference_url: None,
        }
    }

    #[tokio::test]
    async fn test_generate_builds_context_from_inputs() {
        let llm = RecordingCompletion::replying(["1. Description: Cloud migration"]);
        let source = StaticReferenceSource(vec!["Index clause".to_string()]);

        let ctx = generate_sow(&llm, &model_settings(), &source, &Client::new(), request())
            .await
            .unwrap();

        assert_eq!(ctx.draft, "1. Description: Cloud migration");
        assert_eq!(ctx.clauses, vec!["Index clause", "Pasted clause"]);
        assert_eq!(ctx.revision, 0);

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Vendor shall deliver X by Q3."));
        assert!(prompts[0].contains("Index clause\n---\nPasted clause"));
    }

    #[tokio::test]
    async fn test_generate_passes_model_settings() {
        let llm = RecordingCompletion::replying(["draft"]);
        let source = StaticReferenceSource(vec![]);
        generate_sow(&llm, &model_settings(), &source, &Client::new(), request())
            .await
            .unwrap();

        assert_eq!(llm.models(), vec![("test-model".to_string(), 0.5)]);
    }

    #[tokio::test]
    async fn test_generate_with_unreachable_url_still_succeeds() {
        let llm = RecordingCompletion::replying(["draft"]);
        let source = StaticReferenceSource(vec![]);
        let mut req = request();
        req.reference_url = Some("http://127.0.0.1:1/clauses".to_string());

        let ctx = generate_sow(&llm, &model_settings(), &source, &Client::new(), req)
            .await
            .unwrap();
        assert!(ctx.clauses[1].starts_with(URL_ERROR_PREFIX));
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_description() {
        let llm = RecordingCompletion::replying(["draft"]);
        let source = StaticReferenceSource(vec![]);
        let mut req = request();
        req.user_description = "   ".to_string();

        let err = generate_sow(&llm, &model_settings(), &source, &Client::new(), req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_generate_propagates_completion_failure() {
        let source = StaticReferenceSource(vec![]);
        let err = generate_sow(
            &FailingCompletion,
            &model_settings(),
            &source,
            &Client::new(),
            request(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Completion(_)));
    }

    #[tokio::test]
    async fn test_refine_keeps_inputs_and_omits_clauses_from_prompt() {
        let llm = RecordingCompletion::replying(["first draft", "refined draft"]);
        let source = StaticReferenceSource(vec!["Index clause about IP ownership".to_string()]);
        let ctx = generate_sow(&llm, &model_settings(), &source, &Client::new(), request())
            .await
            .unwrap();

        let refined = refine_sow(&llm, &model_settings(), &ctx, "Add a 30-day warranty")
            .await
            .unwrap();

        assert_eq!(refined.draft, "refined draft");
        assert_eq!(refined.revision, 1);
        assert_eq!(refined.clauses, ctx.clauses);
        assert_eq!(refined.source_text, ctx.source_text);

        let prompts = llm.prompts();
        let refine_prompt = &prompts[1];
        assert!(refine_prompt.contains("first draft"));
        assert!(refine_prompt.contains("Add a 30-day warranty"));
        assert!(!refine_prompt.contains("Index clause about IP ownership"));
        assert!(!refine_prompt.contains("Vendor shall deliver X by Q3."));
    }

    #[tokio::test]
    async fn test_refine_rejects_blank_feedback() {
        let llm = RecordingCompletion::replying(["draft", "unused"]);
        let source = StaticReferenceSource(vec![]);
        let ctx = generate_sow(&llm, &model_settings(), &source, &Client::new(), request())
            .await
            .unwrap();

        let err = refine_sow(&llm, &model_settings(), &ctx, " \n ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_sections() {
        let draft = "1. Description\n2. function\n3. Price\n4. Milestones\n5. Warranties";
        assert_eq!(missing_sections(draft), vec!["Service Levels", "Others"]);
        assert!(missing_sections(&SECTION_LABELS.join("\n")).is_empty());
    }
}
