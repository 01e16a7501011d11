pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use crate::repository::{InMemoryQuizRepository, PgQuizRepository, QuizRepository};
use crate::services::quiz_service::QuizService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
}

impl AppState {
    pub fn new(repo: Arc<dyn QuizRepository>) -> Self {
        Self {
            quiz_service: QuizService::new(repo),
        }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgQuizRepository::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryQuizRepository::new()))
    }
}
