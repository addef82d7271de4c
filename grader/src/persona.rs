use serde::{Deserialize, Serialize};

/// Built-in grading personas offered by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaProfile {
    #[default]
    Balanced,
    Strict,
    Insightful,
}

impl PersonaProfile {
    pub fn instructions(&self) -> &'static str {
        match self {
            PersonaProfile::Balanced => {
                "- **Grading:** Be fair and balanced. Give partial credit where due.\n\
                 - **Feedback:** Provide constructive criticism. Clearly state what is correct and what is incorrect."
            }
            PersonaProfile::Strict => {
                "- **Grading:** Be meticulous and strict. Penalize any inaccuracies, omissions, or poor phrasing.\n\
                 - **Feedback:** Be formal and direct. Start by identifying the primary flaw, then list all errors."
            }
            PersonaProfile::Insightful => {
                "- **Grading:** Focus on understanding, not just keywords. Be encouraging.\n\
                 - **Feedback:** Be warm, conversational, and use \"I\" statements. Frame mistakes as learning opportunities.\n    \
                 - Start by finding something positive they understood.\n    \
                 - Gently explain the misunderstanding or missing part.\n    \
                 - End with an encouraging remark."
            }
        }
    }
}

/// Picks the persona text for a request: explicit instructions are used
/// verbatim, otherwise the chosen (or default) profile supplies them.
pub fn resolve_persona(instructions: Option<String>, profile: Option<PersonaProfile>) -> String {
    match instructions {
        Some(text) => text,
        None => profile.unwrap_or_default().instructions().to_string(),
    }
}
