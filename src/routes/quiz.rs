use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::quiz_dto::{
        CreateQuizPayload, PublicQuizResponse, QuizAttemptResponse, QuizResponse,
        QuizResultResponse, SubmitAnswersPayload,
    },
    error::{Error, Result},
    utils::json::ApiJson,
    AppState,
};

/// Ids that are not UUIDs cannot name an existing quiz.
fn parse_quiz_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::NotFound(format!("Quiz {} not found", raw)))
}

#[utoipa::path(
    post,
    path = "/api/quizzes/",
    tag = "quizzes",
    request_body = CreateQuizPayload,
    responses(
        (status = 201, description = "Quiz created with its questions", body = QuizResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateQuizPayload>,
) -> Result<impl IntoResponse> {
    let created = state.quiz_service.create_quiz(payload).await?;
    Ok((StatusCode::CREATED, Json(QuizResponse::from(&created))))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}/",
    tag = "quizzes",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Quiz without correct answers", body = PublicQuizResponse),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let quiz_id = parse_quiz_id(&id)?;
    let quiz = state.quiz_service.get_quiz(quiz_id).await?;
    Ok(Json(PublicQuizResponse::from(&quiz)))
}

#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/submit/",
    tag = "quizzes",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = SubmitAnswersPayload,
    responses(
        (status = 200, description = "Scored submission", body = QuizResultResponse),
        (status = 400, description = "Body is not JSON or answers are not a mapping of strings"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let quiz_id = parse_quiz_id(&id)?;
    let result = state.quiz_service.submit_answers(quiz_id, &body).await?;
    Ok(Json(QuizResultResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}/attempts/",
    tag = "quizzes",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Attempts, newest first", body = [QuizAttemptResponse]),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn list_attempts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let quiz_id = parse_quiz_id(&id)?;
    let attempts: Vec<QuizAttemptResponse> = state
        .quiz_service
        .list_attempts(quiz_id)
        .await?
        .into_iter()
        .map(QuizAttemptResponse::from)
        .collect();
    Ok(Json(attempts))
}
