use axum_extra::TypedHeader;
use grader::{Credential, GradeError};
use headers::{authorization::Bearer, Authorization};
use serde_json::Value;

/// Optional `Authorization: Bearer <key>` header on a grading request.
pub type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

/// Finds the caller's Gemini key. A body `apiKey` field, when present, is the
/// only source: a blank or non-string value is a missing key. The bearer token
/// is consulted only when the body has no `apiKey` field at all. Runs before
/// the rest of the body is validated.
pub fn resolve_credential(body: &Value, bearer: &BearerHeader) -> Result<Credential, GradeError> {
    if let Some(field) = body.get("apiKey") {
        return match field.as_str() {
            Some(key) => Credential::new(key),
            None => Err(GradeError::MissingCredential),
        };
    }

    match bearer {
        Some(TypedHeader(auth)) => {
            log::debug!("using API key from Authorization header");
            Credential::new(auth.token())
        }
        None => Err(GradeError::MissingCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bearer(token: &str) -> BearerHeader {
        Some(TypedHeader(Authorization::bearer(token).unwrap()))
    }

    #[test]
    fn body_key_is_preferred() {
        let credential =
            resolve_credential(&json!({"apiKey": "from-body"}), &bearer("from-header")).unwrap();
        assert_eq!(credential.expose(), "from-body");
    }

    #[test]
    fn empty_body_key_is_missing_even_with_a_header() {
        for body in [json!({"apiKey": ""}), json!({"apiKey": "   "}), json!({"apiKey": null})] {
            assert!(matches!(
                resolve_credential(&body, &bearer("from-header")),
                Err(GradeError::MissingCredential)
            ));
        }
    }

    #[test]
    fn header_is_used_when_body_has_no_key_field() {
        let credential = resolve_credential(&json!({}), &bearer("from-header")).unwrap();
        assert_eq!(credential.expose(), "from-header");
    }

    #[test]
    fn no_key_anywhere_is_missing() {
        assert!(matches!(
            resolve_credential(&json!({"apiKey": ""}), &None),
            Err(GradeError::MissingCredential)
        ));
        assert!(matches!(
            resolve_credential(&json!({}), &None),
            Err(GradeError::MissingCredential)
        ));
        assert!(matches!(
            resolve_credential(&json!({"apiKey": 42}), &None),
            Err(GradeError::MissingCredential)
        ));
    }
}
