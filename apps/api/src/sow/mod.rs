// Statement of Work generator.
// Implements: upload extraction, reference clauses, initial draft, refinement, DOCX export.
// All LLM calls go through llm_client; no direct HTTP calls to the completion endpoint here.

pub mod builder;
pub mod handlers;
pub mod prompts;
pub mod workflow;
