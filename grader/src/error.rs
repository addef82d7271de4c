use std::fmt;
use thiserror::Error;

/// Marker the Gemini API puts in its error body when the key is rejected.
pub const INVALID_KEY_MARKER: &str = "API_KEY_INVALID";

/// Which model call produced a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    ExtractQuestions,
    ExtractAnswers,
    Evaluate,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStep::ExtractQuestions => "Questions",
            PipelineStep::ExtractAnswers => "Model Answers",
            PipelineStep::Evaluate => "Evaluation",
        };
        f.write_str(name)
    }
}

/// Failure of a grading request. `Display` is the message shown to the
/// caller, so variants that carry diagnostics keep them out of it.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("No API key provided.")]
    MissingCredential,

    #[error("API_KEY_INVALID")]
    InvalidCredential,

    #[error("Could not build question bank. Check inputs.")]
    EmptyQuestionBank,

    #[error("The model returned an invalid format. Please try again.")]
    ResponseFormat {
        step: PipelineStep,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    ExternalService(String),
}

impl GradeError {
    /// True when the caller can fix the request; false for model or server
    /// side failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GradeError::MissingCredential
                | GradeError::InvalidCredential
                | GradeError::EmptyQuestionBank
                | GradeError::InvalidRequest(_)
        )
    }
}

/// Maps a failed model call onto the error taxonomy.
///
/// Key rejection is only recognisable by the marker text in the failure
/// description, so this breaks if Gemini rewords its error body.
pub fn classify_model_failure(err: &anyhow::Error) -> GradeError {
    let description = format!("{:#}", err);
    if description.contains(INVALID_KEY_MARKER) {
        GradeError::InvalidCredential
    } else {
        GradeError::ExternalService(description)
    }
}
