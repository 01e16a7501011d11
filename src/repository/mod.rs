//! Persistence boundary for quizzes, questions and attempts.
//!
//! Services depend only on [`QuizRepository`]. [`postgres::PgQuizRepository`]
//! is the production store; [`memory::InMemoryQuizRepository`] backs tests and
//! database-less local runs.

pub mod memory;
pub mod postgres;

use axum::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::question::Question;
use crate::models::quiz::{NewQuiz, Quiz, QuizWithQuestions};
use crate::models::quiz_attempt::{NewQuizAttempt, QuizAttempt};

pub use memory::InMemoryQuizRepository;
pub use postgres::PgQuizRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Stores the quiz and all of its questions atomically.
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<QuizWithQuestions>;

    async fn get_quiz_by_id(&self, id: Uuid) -> Result<Option<Quiz>>;

    /// Questions of a quiz sorted by `order` ascending.
    async fn list_questions_ordered(&self, quiz_id: Uuid) -> Result<Vec<Question>>;

    async fn create_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt>;

    /// Attempts of a quiz, newest first.
    async fn list_attempts(&self, quiz_id: Uuid) -> Result<Vec<QuizAttempt>>;
}
