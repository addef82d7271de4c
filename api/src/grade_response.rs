use grader::{EvaluationResult, GradingOutcome, QuestionBankEntry, SimilarityScore};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    pub evaluation: Vec<EvaluationResult>,
    pub question_bank: Vec<QuestionBankEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<Vec<SimilarityScore>>,
}

impl From<GradingOutcome> for GradeResponse {
    fn from(outcome: GradingOutcome) -> Self {
        Self {
            evaluation: outcome.evaluation,
            question_bank: outcome.question_bank,
            similarity: None,
        }
    }
}
