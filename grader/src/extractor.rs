use crate::credential::Credential;
use crate::error::{classify_model_failure, GradeError};
use crate::json_text::strip_code_fences;
use crate::model_client::{ModelClient, PromptPart};
use crate::models::{Category, InputPayload};
use std::sync::Arc;

/// Transcribes numbered questions or answers out of a text or image input.
pub struct Extractor {
    model: Arc<dyn ModelClient>,
}

impl Extractor {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Returns the model's reply with code fences removed. The text is
    /// expected to be a JSON array of `{id, text}` but is not parsed here.
    pub async fn extract(
        &self,
        input: &InputPayload,
        category: Category,
        credential: &Credential,
    ) -> Result<String, GradeError> {
        let parts = build_parts(input, category);

        let response = self
            .model
            .generate(parts, credential)
            .await
            .map_err(|e| classify_model_failure(&e))?;

        Ok(strip_code_fences(&response))
    }
}

fn build_parts(input: &InputPayload, category: Category) -> Vec<PromptPart> {
    let instruction = build_instruction(category);

    match input {
        InputPayload::Image { .. } => vec![
            PromptPart::text(instruction),
            PromptPart::from_input(input, str::to_string),
            PromptPart::text(format!("Extract all {category} from this image.")),
        ],
        InputPayload::Text { data } => vec![PromptPart::text(format!(
            "{instruction}\n\nHere is the text:\n\n{data}\n\nExtract all {category} from this text."
        ))],
    }
}

fn build_instruction(category: Category) -> String {
    format!(
        r#"
You are an expert OCR and data extraction tool. Your task is to read all text from the provided input and extract it into a specific JSON format.
The user is providing {category}.
You must find all {category}, identify their number or ID (e.g., "Q1", "1)", "Answer 1"), and transcribe their full text content.
Respond ONLY with a valid JSON array matching this schema:
[
    {{"id": "string", "text": "string"}},
    ...
]
"#
    )
}
