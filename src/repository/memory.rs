use axum::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::QuizRepository;
use crate::error::Result;
use crate::models::question::Question;
use crate::models::quiz::{NewQuiz, Quiz, QuizWithQuestions};
use crate::models::quiz_attempt::{NewQuizAttempt, QuizAttempt};

#[derive(Debug, Default)]
struct Store {
    quizzes: HashMap<Uuid, Quiz>,
    questions: HashMap<Uuid, Vec<Question>>,
    // Insertion order doubles as submission order.
    attempts: Vec<QuizAttempt>,
}

/// Process-local store. Every write happens under one lock, so a quiz and its
/// questions become visible together.
#[derive(Clone, Default)]
pub struct InMemoryQuizRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create_quiz(&self, new_quiz: NewQuiz) -> Result<QuizWithQuestions> {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: new_quiz.title,
            created_at: Utc::now(),
        };
        let questions: Vec<Question> = new_quiz
            .questions
            .into_iter()
            .map(|q| Question {
                id: Uuid::new_v4(),
                quiz_id: quiz.id,
                question_text: q.question_text,
                question_type: q.question_type,
                options: q.options,
                correct_answer: q.correct_answer,
                order: q.order,
            })
            .collect();

        let mut store = self.store.write().await;
        store.quizzes.insert(quiz.id, quiz.clone());
        store.questions.insert(quiz.id, questions.clone());

        Ok(QuizWithQuestions { quiz, questions })
    }

    async fn get_quiz_by_id(&self, id: Uuid) -> Result<Option<Quiz>> {
        let store = self.store.read().await;
        Ok(store.quizzes.get(&id).cloned())
    }

    async fn list_questions_ordered(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let store = self.store.read().await;
        let mut questions = store.questions.get(&quiz_id).cloned().unwrap_or_default();
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }

    async fn create_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt> {
        let attempt = QuizAttempt {
            id: Uuid::new_v4(),
            quiz_id: attempt.quiz_id,
            answers: attempt.answers,
            score: attempt.score,
            total_questions: attempt.total_questions,
            submitted_at: Utc::now(),
        };
        self.store.write().await.attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn list_attempts(&self, quiz_id: Uuid) -> Result<Vec<QuizAttempt>> {
        let store = self.store.read().await;
        Ok(store
            .attempts
            .iter()
            .rev()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }
}
