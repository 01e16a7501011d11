pub mod docs;
pub mod health;
pub mod quiz;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Full HTTP surface. Every quiz route is served with and without a trailing slash.
pub fn router(state: AppState) -> Router {
    let quiz_api = Router::new()
        .route("/api/quizzes", post(quiz::create_quiz))
        .route("/api/quizzes/", post(quiz::create_quiz))
        .route("/api/quizzes/:id", get(quiz::get_quiz))
        .route("/api/quizzes/:id/", get(quiz::get_quiz))
        .route("/api/quizzes/:id/submit", post(quiz::submit_quiz))
        .route("/api/quizzes/:id/submit/", post(quiz::submit_quiz))
        .route("/api/quizzes/:id/attempts", get(quiz::list_attempts))
        .route("/api/quizzes/:id/attempts/", get(quiz::list_attempts));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi))
        .merge(quiz_api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
