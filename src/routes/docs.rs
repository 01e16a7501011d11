use axum::Json;
use utoipa::OpenApi;

use crate::dto::quiz_dto::{
    CreateQuestionPayload, CreateQuizPayload, PublicQuestion, PublicQuizResponse,
    QuestionResponse, QuestionResultResponse, QuizAttemptResponse, QuizResponse,
    QuizResultResponse, SubmitAnswersPayload,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::quiz::create_quiz,
        crate::routes::quiz::get_quiz,
        crate::routes::quiz::submit_quiz,
        crate::routes::quiz::list_attempts,
    ),
    components(schemas(
        CreateQuestionPayload,
        CreateQuizPayload,
        PublicQuestion,
        PublicQuizResponse,
        QuestionResponse,
        QuestionResultResponse,
        QuizAttemptResponse,
        QuizResponse,
        QuizResultResponse,
        SubmitAnswersPayload,
    )),
    tags(
        (name = "quizzes", description = "Quiz creation, retrieval and scoring"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
