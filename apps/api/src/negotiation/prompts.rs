// Negotiation prompt templates.
// All prompts for the negotiation module are defined here.

/// Stands in for the buyer's position on the supplier's opening turn.
pub const OPENING_ROUND_NOTE: &str = "This is the opening round. The buyer has not responded yet.";

/// Supplier turn.
/// Replace: {round}, {clause_text}, {supplier_objectives}, {buyer_position}
pub const SUPPLIER_TURN_TEMPLATE: &str = r#"You are negotiating a contract clause on behalf of the SUPPLIER. This is round {round}.

---
Clause under negotiation:
{clause_text}

---
Supplier objectives:
{supplier_objectives}

---
Buyer's latest position:
{buyer_position}

---
Respond as the supplier's negotiator. Propose revised clause language that advances the supplier objectives, respond to the buyer's latest position point by point, and state briefly which concessions you can and cannot make."#;

/// Buyer turn.
/// Replace: {round}, {clause_text}, {buyer_objectives}, {supplier_position}
pub const BUYER_TURN_TEMPLATE: &str = r#"You are negotiating a contract clause on behalf of the BUYER. This is round {round}.

---
Clause under negotiation:
{clause_text}

---
Buyer objectives:
{buyer_objectives}

---
Supplier's proposal this round:
{supplier_position}

---
Respond as the buyer's negotiator. Accept, reject or counter each point of the supplier's proposal, propose revised clause language that protects the buyer objectives, and explain the business reason for each change."#;

/// Final arbitration.
/// Replace: {clause_text}, {transcript}
pub const ARBITRATION_TEMPLATE: &str = r#"You are a neutral arbitrator reviewing a completed negotiation between a supplier and a buyer over one contract clause.

---
Original clause:
{clause_text}

---
Negotiation transcript:
{transcript}

---
Draft a single final clause that fairly balances both sides' positions as they stood at the end of the negotiation. Output only the final clause text, with no commentary, headings or explanation."#;
