use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// One of the three caller-supplied inputs: a question sheet, a model answer
/// sheet or a student answer sheet, given either as plain text or as a
/// base64-encoded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum InputPayload {
    Text {
        data: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// What the extractor is asked to pull out of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Questions,
    Answers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Questions => "questions",
            Category::Answers => "answers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub text: String,
}

/// A question paired with its model answer. `id` keeps the question's raw
/// label so callers can display it as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBankEntry {
    pub id: String,
    pub question: String,
    pub model_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub extracted_answer: String,
    #[serde(deserialize_with = "grade_from_number_or_string")]
    pub grade: Number,
    #[serde(default, deserialize_with = "text_or_null")]
    pub feedback: String,
}

/// Everything a successful grading run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingOutcome {
    pub evaluation: Vec<EvaluationResult>,
    pub question_bank: Vec<QuestionBankEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityScore {
    pub id: String,
    pub score: f32,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or a number, got {}",
            other
        ))),
    }
}

fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Models sometimes quote the grade ("8") even though a number is asked for.
fn grade_from_number_or_string<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n),
        Value::String(s) => serde_json::from_str::<Number>(s.trim())
            .map_err(|_| serde::de::Error::custom(format!("grade {:?} is not numeric", s))),
        other => Err(serde::de::Error::custom(format!(
            "grade must be a number, got {}",
            other
        ))),
    }
}

// ---- Gemini generateContent wire types ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponsePart {
    pub text: Option<String>,
}
