//! Prompt Builder: turns session inputs into one of two fixed SoW prompts.
//!
//! The refine prompt deliberately omits the source extract and clause set:
//! once a draft exists, only the draft and the feedback are resent.

use crate::llm_client::prompts::fill_template;
use crate::sow::prompts::{
    EXAMPLE_SEPARATOR, INITIAL_PROMPT_TEMPLATE, NO_EXAMPLES_PLACEHOLDER, REFINE_PROMPT_TEMPLATE,
    SOW_STRUCTURE,
};

#[derive(Debug, Clone, Copy)]
pub enum PromptInput<'a> {
    Initial {
        source_text: &'a str,
        user_description: &'a str,
        clauses: &'a [String],
    },
    Refine {
        prior_draft: &'a str,
        feedback: &'a str,
    },
}

pub fn build_prompt(input: PromptInput<'_>) -> String {
    match input {
        PromptInput::Initial {
            source_text,
            user_description,
            clauses,
        } => {
            let examples = if clauses.is_empty() {
                NO_EXAMPLES_PLACEHOLDER.to_string()
            } else {
                clauses.join(EXAMPLE_SEPARATOR)
            };
            fill_template(
                INITIAL_PROMPT_TEMPLATE,
                &[
                    ("user_description", user_description),
                    ("source_text", source_text),
                    ("examples", &examples),
                    ("structure", SOW_STRUCTURE),
                ],
            )
        }
        PromptInput::Refine {
            prior_draft,
            feedback,
        } => fill_template(
            REFINE_PROMPT_TEMPLATE,
            &[
                ("prior_draft", prior_draft),
                ("feedback", feedback),
                ("structure", SOW_STRUCTURE),
            ],
        ),
    }
}
