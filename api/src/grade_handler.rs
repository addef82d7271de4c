use crate::api_error::ApiError;
use crate::auth::{resolve_credential, BearerHeader};
use crate::grade_request::GradePayload;
use crate::grade_response::GradeResponse;
use crate::routes::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use grader::{score_evaluations, GradeError};
use serde_json::Value;

pub async fn handle_grade(
    State(state): State<AppState>,
    bearer: BearerHeader,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GradeResponse>, ApiError> {
    let Json(body) =
        body.map_err(|rejection| GradeError::InvalidRequest(rejection.body_text()))?;

    let credential = resolve_credential(&body, &bearer)?;
    let (request, include_similarity) = GradePayload::from_json(body)?.into_grading_request();

    let outcome = state.grading.grade(&request, &credential).await?;

    let similarity =
        include_similarity.then(|| score_evaluations(&outcome.evaluation, &outcome.question_bank));

    Ok(Json(GradeResponse {
        similarity,
        ..GradeResponse::from(outcome)
    }))
}
