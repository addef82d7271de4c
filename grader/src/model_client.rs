use crate::credential::Credential;
use crate::models::InputPayload;
use anyhow::Result;
use async_trait::async_trait;

/// One piece of a multi-part prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    Image { mime_type: String, data: String },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text(text.into())
    }

    /// Image payloads become an inline image part; text payloads are wrapped
    /// with `frame` before becoming a text part.
    pub fn from_input(input: &InputPayload, frame: impl FnOnce(&str) -> String) -> Self {
        match input {
            InputPayload::Image { data, mime_type } => PromptPart::Image {
                mime_type: mime_type.clone(),
                data: data.clone(),
            },
            InputPayload::Text { data } => PromptPart::Text(frame(data)),
        }
    }
}

/// The single capability the pipeline needs from a generative model: turn an
/// ordered list of prompt parts into response text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, parts: Vec<PromptPart>, credential: &Credential) -> Result<String>;
}

#[cfg(any(test, feature = "test-support"))]
pub use scripted::ScriptedModel;

#[cfg(any(test, feature = "test-support"))]
mod scripted {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every prompt it was
    /// given.
    #[derive(Default)]
    pub struct ScriptedModel {
        responses: Mutex<VecDeque<std::result::Result<String, String>>>,
        calls: Mutex<Vec<Vec<PromptPart>>>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, text: impl Into<String>) -> Self {
            self.push(Ok(text.into()));
            self
        }

        pub fn fail(self, description: impl Into<String>) -> Self {
            self.push(Err(description.into()));
            self
        }

        pub fn calls(&self) -> Vec<Vec<PromptPart>> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn call_count(&self) -> usize {
            self.calls().len()
        }

        fn push(&self, response: std::result::Result<String, String>) {
            if let Ok(mut queue) = self.responses.lock() {
                queue.push_back(response);
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn generate(&self, parts: Vec<PromptPart>, _credential: &Credential) -> Result<String> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(parts);
            }
            let next = self
                .responses
                .lock()
                .map_err(|_| anyhow::anyhow!("scripted model lock poisoned"))?
                .pop_front();
            match next {
                Some(Ok(text)) => Ok(text),
                Some(Err(description)) => Err(anyhow::anyhow!(description)),
                None => Err(anyhow::anyhow!("scripted model has no response left")),
            }
        }
    }
}
