// Statement of Work prompt templates.
// All prompts for the sow module are defined here.

/// The seven section labels every SoW must carry, in order.
pub const SECTION_LABELS: [&str; 7] = [
    "Description",
    "Function",
    "Price",
    "Milestones",
    "Warranties",
    "Service Levels",
    "Others",
];

/// Numbered section outline shared by both templates.
pub const SOW_STRUCTURE: &str = "\
1. Description – What is being supplied or done.
2. Function – The business purpose or outcome the goods/services serve.
3. Price – Pricing structure, billing frequency, and payment terms.
4. Milestones – Key deliverables with corresponding deadlines or phases.
5. Warranties – Any performance guarantees, service warranties, or coverage periods.
6. Service Levels (if applicable) – SLAs, KPIs, uptime, penalties, or escalation paths.
7. Others – Any additional relevant clauses not captured above (e.g. assumptions, subcontracting, ownership of deliverables).";

/// Rendered in place of the example block when no clauses were collected.
pub const NO_EXAMPLES_PLACEHOLDER: &str = "None included";

/// Joins collected example clauses inside the initial prompt.
pub const EXAMPLE_SEPARATOR: &str = "\n---\n";

/// Initial generation prompt.
/// Replace: {user_description}, {source_text}, {examples}, {structure}
pub const INITIAL_PROMPT_TEMPLATE: &str = r#"You are a legal AI assistant. Based on the following base contract text, user description, and example SoW clauses, generate a detailed Statement of Work (SoW). You should also search the Internet for any information or SoW which are the same or similar as the subject in question and incorporate relevant information from there.

---
User Description:
{user_description}

---
Base Document Extract:
{source_text}

---
Example SoWs:
{examples}

---
Generate the SoW using the following structure:

{structure}

Also suggest questions for missing or unclear details."#;

/// Refinement prompt. Carries only the prior draft and the feedback.
/// Replace: {prior_draft}, {feedback}, {structure}
pub const REFINE_PROMPT_TEMPLATE: &str = r#"You are a legal AI assistant. Based on the existing Statement of Work and the user's feedback, generate an improved version of the SoW. Retain all parts that have not been highlighted or are not relevant to the changes requested in the feedback.

---
Existing Statement of Work:
{prior_draft}

---
User Feedback for Refinement:
{feedback}

---
Generate the improved SoW using the original structure:
{structure}"#;
