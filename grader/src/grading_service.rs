use crate::credential::Credential;
use crate::error::{GradeError, PipelineStep};
use crate::evaluator::Evaluator;
use crate::extractor::Extractor;
use crate::json_text::parse_model_output;
use crate::model_client::ModelClient;
use crate::models::*;
use crate::question_bank::merge;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// The three inputs and the persona for one grading run.
#[derive(Debug, Clone)]
pub struct GradingRequest {
    pub questions: InputPayload,
    pub model_answers: InputPayload,
    pub student: InputPayload,
    pub persona: String,
}

/// Runs extraction, merge and evaluation in order for a single request.
pub struct GradingService {
    extractor: Extractor,
    evaluator: Evaluator,
}

impl GradingService {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            extractor: Extractor::new(model.clone()),
            evaluator: Evaluator::new(model),
        }
    }

    pub async fn grade(
        &self,
        request: &GradingRequest,
        credential: &Credential,
    ) -> Result<GradingOutcome, GradeError> {
        let request_id = Uuid::new_v4();
        let start_time = Instant::now();

        let result = self.run(request_id, request, credential).await;

        match &result {
            Ok(outcome) => log::info!(
                "[{}] graded {} answers against {} bank entries in {} ms",
                request_id,
                outcome.evaluation.len(),
                outcome.question_bank.len(),
                start_time.elapsed().as_millis()
            ),
            Err(GradeError::ResponseFormat { step, raw, source }) => {
                log::error!("[{}] JSON decode error: {}", request_id, source);
                log::error!(
                    "[{}] Raw model output ({}) which caused the error: {}",
                    request_id,
                    step,
                    raw
                );
            }
            Err(err) => log::error!("[{}] grading failed: {}", request_id, err),
        }

        result
    }

    async fn run(
        &self,
        request_id: Uuid,
        request: &GradingRequest,
        credential: &Credential,
    ) -> Result<GradingOutcome, GradeError> {
        log::info!("[{}] extracting questions", request_id);
        let questions_json = self
            .extractor
            .extract(&request.questions, Category::Questions, credential)
            .await?;
        let questions: Vec<ExtractedItem> =
            parse_model_output(&questions_json, PipelineStep::ExtractQuestions)?;

        log::info!("[{}] extracting model answers", request_id);
        let answers_json = self
            .extractor
            .extract(&request.model_answers, Category::Answers, credential)
            .await?;
        let answers: Vec<ExtractedItem> =
            parse_model_output(&answers_json, PipelineStep::ExtractAnswers)?;

        let question_bank = merge(&questions, &answers);
        log::info!(
            "[{}] matched {} of {} questions with {} answers",
            request_id,
            question_bank.len(),
            questions.len(),
            answers.len()
        );
        if question_bank.is_empty() {
            return Err(GradeError::EmptyQuestionBank);
        }

        log::info!("[{}] evaluating student answers", request_id);
        let evaluation_json = self
            .evaluator
            .evaluate(&request.student, &question_bank, &request.persona, credential)
            .await?;
        let evaluation: Vec<EvaluationResult> =
            parse_model_output(&evaluation_json, PipelineStep::Evaluate)?;

        Ok(GradingOutcome {
            evaluation,
            question_bank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_client::{PromptPart, ScriptedModel};
    use serde_json::json;

    fn text(data: &str) -> InputPayload {
        InputPayload::Text {
            data: data.to_string(),
        }
    }

    fn request() -> GradingRequest {
        GradingRequest {
            questions: text("1. Q?"),
            model_answers: text("1. A"),
            student: text("1. A"),
            persona: "Be kind.".to_string(),
        }
    }

    fn credential() -> Credential {
        Credential::new("test-key").unwrap()
    }

    #[tokio::test]
    async fn full_pipeline_returns_evaluation_and_bank() {
        let model = Arc::new(
            ScriptedModel::new()
                .respond(r#"[{"id":"1","text":"Q?"}]"#)
                .respond("```json\n[{\"id\":\"1\",\"text\":\"A\"}]\n```")
                .respond(r#"[{"id":"1","extracted_answer":"A","grade":8,"feedback":"ok"}]"#),
        );
        let service = GradingService::new(model.clone());

        let outcome = service.grade(&request(), &credential()).await.unwrap();

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "evaluation": [{"id":"1","extracted_answer":"A","grade":8,"feedback":"ok"}],
                "questionBank": [{"id":"1","question":"Q?","model_answer":"A"}]
            })
        );
        assert_eq!(model.call_count(), 3);

        // The bank handed to the evaluator is the merged one.
        match &model.calls()[2][2] {
            PromptPart::Text(text) => assert!(text.ends_with(
                r#"[{"id":"1","question":"Q?","model_answer":"A"}]"#
            )),
            other => panic!("expected bank text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_question_json_stops_after_first_call() {
        let model = Arc::new(ScriptedModel::new().respond("not json"));
        let service = GradingService::new(model.clone());

        let err = service.grade(&request(), &credential()).await.unwrap_err();

        assert!(matches!(
            err,
            GradeError::ResponseFormat { step: PipelineStep::ExtractQuestions, .. }
        ));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn bad_answer_json_names_answer_step() {
        let model = Arc::new(
            ScriptedModel::new()
                .respond(r#"[{"id":"1","text":"Q?"}]"#)
                .respond("Sure! Here are the answers."),
        );
        let service = GradingService::new(model);

        let err = service.grade(&request(), &credential()).await.unwrap_err();

        assert!(matches!(
            err,
            GradeError::ResponseFormat { step: PipelineStep::ExtractAnswers, .. }
        ));
    }

    #[tokio::test]
    async fn bad_evaluation_json_names_evaluate_step() {
        let model = Arc::new(
            ScriptedModel::new()
                .respond(r#"[{"id":"1","text":"Q?"}]"#)
                .respond(r#"[{"id":"1","text":"A"}]"#)
                .respond(r#"{"id": "1"}"#),
        );
        let service = GradingService::new(model);

        let err = service.grade(&request(), &credential()).await.unwrap_err();

        assert!(matches!(
            err,
            GradeError::ResponseFormat { step: PipelineStep::Evaluate, .. }
        ));
    }

    #[tokio::test]
    async fn empty_bank_skips_evaluation() {
        let model = Arc::new(
            ScriptedModel::new()
                .respond(r#"[{"id":"Q1","text":"Q?"}]"#)
                .respond(r#"[{"id":"Answer 2","text":"A"}]"#),
        );
        let service = GradingService::new(model.clone());

        let err = service.grade(&request(), &credential()).await.unwrap_err();

        assert!(matches!(err, GradeError::EmptyQuestionBank));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn rejected_key_from_evaluation_is_reported() {
        let model = Arc::new(
            ScriptedModel::new()
                .respond(r#"[{"id":"1","text":"Q?"}]"#)
                .respond(r#"[{"id":"1","text":"A"}]"#)
                .fail("Gemini API error (400 Bad Request): API_KEY_INVALID"),
        );
        let service = GradingService::new(model);

        let err = service.grade(&request(), &credential()).await.unwrap_err();

        assert!(matches!(err, GradeError::InvalidCredential));
    }

    #[tokio::test]
    async fn persona_reaches_the_evaluator_verbatim() {
        let model = Arc::new(
            ScriptedModel::new()
                .respond(r#"[{"id":"1","text":"Q?"}]"#)
                .respond(r#"[{"id":"1","text":"A"}]"#)
                .respond("[]"),
        );
        let service = GradingService::new(model.clone());

        let outcome = service.grade(&request(), &credential()).await.unwrap();

        assert!(outcome.evaluation.is_empty());
        match &model.calls()[2][0] {
            PromptPart::Text(text) => assert!(text.contains("---\nBe kind.\n---")),
            other => panic!("expected instruction, got {other:?}"),
        }
    }
}
