pub mod credential;
pub mod error;
pub mod evaluator;
pub mod extractor;
pub mod gemini_service;
pub mod grading_service;
pub mod json_text;
pub mod model_client;
pub mod models;
pub mod persona;
pub mod question_bank;
pub mod similarity;

pub use credential::Credential;
pub use error::{classify_model_failure, GradeError, PipelineStep};
pub use evaluator::Evaluator;
pub use extractor::Extractor;
pub use gemini_service::{GeminiConfig, GeminiService};
pub use grading_service::{GradingRequest, GradingService};
pub use model_client::{ModelClient, PromptPart};
pub use models::*;
pub use persona::{resolve_persona, PersonaProfile};
pub use question_bank::{merge, normalize_id};
pub use similarity::{score_evaluations, tfidf_similarity};

#[cfg(any(test, feature = "test-support"))]
pub use model_client::ScriptedModel;
