//! HTTP grading endpoint.
//!
//! `POST /api/grade` with `{ "question", "answers", "userAnswer" }` answers
//! `200 { "isCorrect", "aiReply" }`, or a non-2xx status with `{ "error" }`.
//! The classifier credential stays inside the wrapped grader.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use civics_core::model::Question;

use super::Grader;

pub const GRADE_PATH: &str = "/api/grade";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub question: String,
    pub answers: Vec<String>,
    pub user_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReply {
    pub is_correct: bool,
    pub ai_reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRequestError {
    pub error: String,
}

type GradeFailure = (StatusCode, Json<GradeRequestError>);

fn failure(status: StatusCode, error: impl Into<String>) -> GradeFailure {
    (
        status,
        Json(GradeRequestError {
            error: error.into(),
        }),
    )
}

/// Router serving the grading endpoint on top of any grader.
pub fn grade_router(grader: Arc<dyn Grader>) -> Router {
    Router::new()
        .route(GRADE_PATH, post(grade))
        .with_state(grader)
}

async fn grade(
    State(grader): State<Arc<dyn Grader>>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> Result<Json<GradeReply>, GradeFailure> {
    let Json(request) =
        payload.map_err(|rejection| failure(StatusCode::BAD_REQUEST, rejection.body_text()))?;

    let question = Question::new(request.question, request.answers)
        .map_err(|err| failure(StatusCode::BAD_REQUEST, err.to_string()))?;
    let user_answer = request.user_answer.trim();
    if user_answer.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "userAnswer is empty"));
    }

    info!(question = question.text(), user_answer, "grade request");
    match grader.grade(&question, user_answer).await {
        Ok(verdict) => Ok(Json(GradeReply {
            is_correct: verdict.is_correct,
            ai_reply: verdict.rationale,
        })),
        Err(err) => {
            warn!(error = %err, "grading failed");
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
        }
    }
}
