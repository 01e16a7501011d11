use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::quiz_dto::{parse_answers, CreateQuizPayload, SubmitAnswersPayload};
use crate::error::{Error, Result};
use crate::models::quiz::{Quiz, QuizWithQuestions};
use crate::models::quiz_attempt::{NewQuizAttempt, QuizAttempt};
use crate::repository::QuizRepository;
use crate::services::scoring_service::{QuizScore, ScoringService};

#[derive(Clone)]
pub struct QuizService {
    repo: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repo: Arc<dyn QuizRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_quiz(&self, payload: CreateQuizPayload) -> Result<QuizWithQuestions> {
        payload.validate()?;

        let created = self.repo.create_quiz(payload.into_new_quiz()?).await?;
        tracing::info!(
            quiz_id = %created.quiz.id,
            questions = created.questions.len(),
            "Quiz created"
        );
        Ok(created)
    }

    pub async fn get_quiz(&self, quiz_id: Uuid) -> Result<QuizWithQuestions> {
        let quiz = self.find_quiz(quiz_id).await?;
        let questions = self.repo.list_questions_ordered(quiz.id).await?;
        Ok(QuizWithQuestions { quiz, questions })
    }

    /// Scores a submission and records it as a new attempt. The quiz lookup
    /// happens before the body is parsed, so an unknown quiz is always
    /// `NotFound`.
    pub async fn submit_answers(&self, quiz_id: Uuid, body: &[u8]) -> Result<QuizScore> {
        let quiz = self.find_quiz(quiz_id).await?;
        let payload = SubmitAnswersPayload::from_slice(body)?;
        let answers = parse_answers(payload.answers)?;

        let questions = self.repo.list_questions_ordered(quiz.id).await?;
        let result = ScoringService::score(&questions, &answers);

        let attempt = self
            .repo
            .create_attempt(NewQuizAttempt {
                quiz_id: quiz.id,
                answers,
                score: result.score,
                total_questions: result.total_questions,
            })
            .await?;

        tracing::info!(
            quiz_id = %quiz.id,
            attempt_id = %attempt.id,
            score = result.score,
            total = result.total_questions,
            "Quiz submitted"
        );
        Ok(result)
    }

    pub async fn list_attempts(&self, quiz_id: Uuid) -> Result<Vec<QuizAttempt>> {
        let quiz = self.find_quiz(quiz_id).await?;
        self.repo.list_attempts(quiz.id).await
    }

    async fn find_quiz(&self, quiz_id: Uuid) -> Result<Quiz> {
        self.repo
            .get_quiz_by_id(quiz_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))
    }
}
