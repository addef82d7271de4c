use crate::credential::Credential;
use crate::error::{classify_model_failure, GradeError};
use crate::json_text::strip_code_fences;
use crate::model_client::{ModelClient, PromptPart};
use crate::models::{InputPayload, QuestionBankEntry};
use std::sync::Arc;

/// Grades a student's answer sheet against the question bank.
pub struct Evaluator {
    model: Arc<dyn ModelClient>,
}

impl Evaluator {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Returns the model's grading reply with code fences removed, expected
    /// to be a JSON array of `{id, extracted_answer, grade, feedback}`.
    ///
    /// Nothing checks that every bank entry gets a result or that the ids
    /// line up with the bank.
    pub async fn evaluate(
        &self,
        student: &InputPayload,
        bank: &[QuestionBankEntry],
        persona: &str,
        credential: &Credential,
    ) -> Result<String, GradeError> {
        let parts = build_parts(student, bank, persona)?;

        let response = self
            .model
            .generate(parts, credential)
            .await
            .map_err(|e| classify_model_failure(&e))?;

        Ok(strip_code_fences(&response))
    }
}

fn build_parts(
    student: &InputPayload,
    bank: &[QuestionBankEntry],
    persona: &str,
) -> Result<Vec<PromptPart>, GradeError> {
    let bank_json = serde_json::to_string(bank)
        .map_err(|e| GradeError::ExternalService(format!("failed to serialize question bank: {e}")))?;

    Ok(vec![
        PromptPart::text(build_instruction(persona)),
        PromptPart::from_input(student, |text| {
            format!("Here is the student's answer sheet text: \n\n{text}")
        }),
        PromptPart::text(format!(
            "Grade the student's answers using this question bank: {bank_json}"
        )),
    ])
}

fn build_instruction(persona: &str) -> String {
    format!(
        r#"
You are an expert AI Grader.
---
{persona}
---
You will be given a student's answer (as text or image) and a JSON list of questions and model answers.
Your task is to:
1.  Read the student's answer sheet.
2.  For each question in the JSON, find the student's corresponding answer.
3.  Compare the student's answer to the model_answer.
4.  Grade the student's answer from 0 to 10 based on the persona.
5.  Provide feedback based on the persona.

Respond ONLY with a valid JSON array matching this schema:
[
    {{
        "id": "string",
        "extracted_answer": "string",
        "grade": "number",
        "feedback": "string"
    }},
    ...
]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_client::ScriptedModel;

    fn bank() -> Vec<QuestionBankEntry> {
        vec![QuestionBankEntry {
            id: "Q1".to_string(),
            question: "Capital of France?".to_string(),
            model_answer: "Paris".to_string(),
        }]
    }

    fn credential() -> Credential {
        Credential::new("test-key").unwrap()
    }

    #[tokio::test]
    async fn text_sheet_prompt_has_instruction_sheet_and_bank() {
        let model = Arc::new(ScriptedModel::new().respond("[]"));
        let evaluator = Evaluator::new(model.clone());
        let student = InputPayload::Text {
            data: "1. Paris".to_string(),
        };

        evaluator
            .evaluate(&student, &bank(), "Be strict.", &credential())
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        let parts = &calls[0];
        assert_eq!(parts.len(), 3);
        match &parts[0] {
            PromptPart::Text(text) => assert!(text.contains("---\nBe strict.\n---")),
            other => panic!("expected instruction, got {other:?}"),
        }
        assert_eq!(
            parts[1],
            PromptPart::text("Here is the student's answer sheet text: \n\n1. Paris")
        );
        assert_eq!(
            parts[2],
            PromptPart::text(
                r#"Grade the student's answers using this question bank: [{"id":"Q1","question":"Capital of France?","model_answer":"Paris"}]"#
            )
        );
    }

    #[tokio::test]
    async fn image_sheet_is_sent_inline() {
        let model = Arc::new(ScriptedModel::new().respond("[]"));
        let evaluator = Evaluator::new(model.clone());
        let student = InputPayload::Image {
            data: "/9j/4AAQ".to_string(),
            mime_type: "image/jpeg".to_string(),
        };

        evaluator
            .evaluate(&student, &bank(), "", &credential())
            .await
            .unwrap();

        assert_eq!(
            model.calls()[0][1],
            PromptPart::Image {
                mime_type: "image/jpeg".to_string(),
                data: "/9j/4AAQ".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn reply_is_cleaned() {
        let model = Arc::new(ScriptedModel::new().respond(
            "```json\n[{\"id\":\"Q1\",\"extracted_answer\":\"Paris\",\"grade\":10,\"feedback\":\"ok\"}]\n```",
        ));
        let evaluator = Evaluator::new(model);
        let student = InputPayload::Text { data: "Paris".to_string() };

        let raw = evaluator
            .evaluate(&student, &bank(), "", &credential())
            .await
            .unwrap();

        assert!(raw.starts_with('[') && raw.ends_with(']'));
    }

    #[tokio::test]
    async fn rejected_key_becomes_invalid_credential() {
        let model = Arc::new(ScriptedModel::new().fail(
            r#"Gemini API error (400 Bad Request): {"reason": "API_KEY_INVALID"}"#,
        ));
        let evaluator = Evaluator::new(model);
        let student = InputPayload::Text { data: "Paris".to_string() };

        let err = evaluator
            .evaluate(&student, &bank(), "", &credential())
            .await
            .unwrap_err();

        assert!(matches!(err, GradeError::InvalidCredential));
    }
}
