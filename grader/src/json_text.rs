use crate::error::{GradeError, PipelineStep};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

fn opening_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"\A```[ \t]*(?:json|JSON)?").unwrap())
}

/// Removes a Markdown code fence wrapped around model output.
///
/// Handles "```json ... ```", bare "``` ... ```" and an unterminated opening
/// fence. Text without fences is only trimmed.
pub fn strip_code_fences(raw: &str) -> String {
    let without_open = opening_fence().replace(raw.trim(), "");
    let body = without_open.trim();
    body.strip_suffix("```").unwrap_or(body).trim().to_string()
}

/// Parses cleaned model output, tagging a failure with the step that
/// produced it.
pub fn parse_model_output<T: DeserializeOwned>(raw: &str, step: PipelineStep) -> Result<T, GradeError> {
    serde_json::from_str(raw).map_err(|source| GradeError::ResponseFormat {
        step,
        raw: raw.to_string(),
        source,
    })
}
