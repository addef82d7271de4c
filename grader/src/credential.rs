use crate::error::GradeError;
use std::fmt;

/// Caller-supplied Gemini API key, scoped to one request.
///
/// Never logged: there is no `Display` impl and `Debug` is redacted.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Result<Self, GradeError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(GradeError::MissingCredential);
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
