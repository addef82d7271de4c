use grader::{resolve_persona, GradeError, GradingRequest, InputPayload, PersonaProfile};
use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /grade`. `apiKey` is read separately, before this is parsed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradePayload {
    pub q_input: InputPayload,
    pub m_input: InputPayload,
    pub s_input: InputPayload,
    pub persona_instructions: Option<String>,
    pub persona_profile: Option<PersonaProfile>,
    #[serde(default)]
    pub include_similarity: bool,
}

impl GradePayload {
    pub fn from_json(body: Value) -> Result<Self, GradeError> {
        serde_json::from_value(body)
            .map_err(|e| GradeError::InvalidRequest(format!("Invalid request body: {e}")))
    }

    pub fn into_grading_request(self) -> (GradingRequest, bool) {
        let request = GradingRequest {
            questions: self.q_input,
            model_answers: self.m_input,
            student: self.s_input,
            persona: resolve_persona(self.persona_instructions, self.persona_profile),
        };
        (request, self.include_similarity)
    }
}
