// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include any thinking, explanations or apologies. \
    Start your response with { and end with }.";

/// Reminder appended after caller-supplied data so it is the last thing the model reads.
pub const JSON_ONLY_REMINDER: &str = "Return ONLY the JSON object described above. No other text.";
