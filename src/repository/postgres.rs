use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::QuizRepository;
use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionType};
use crate::models::quiz::{NewQuiz, Quiz, QuizWithQuestions};
use crate::models::quiz_attempt::{AnswerMap, NewQuizAttempt, QuizAttempt};

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: Uuid,
    quiz_id: Uuid,
    question_text: String,
    question_type: String,
    options: Json<Vec<String>>,
    correct_answer: String,
    order: i32,
}

impl TryFrom<QuestionRow> for Question {
    type Error = Error;

    fn try_from(row: QuestionRow) -> Result<Self> {
        let question_type = row
            .question_type
            .parse::<QuestionType>()
            .map_err(Error::Internal)?;
        Ok(Question {
            id: row.id,
            quiz_id: row.quiz_id,
            question_text: row.question_text,
            question_type,
            options: row.options.0,
            correct_answer: row.correct_answer,
            order: row.order,
        })
    }
}

#[derive(Debug, FromRow)]
struct AttemptRow {
    id: Uuid,
    quiz_id: Uuid,
    answers: Json<AnswerMap>,
    score: i32,
    total_questions: i32,
    submitted_at: DateTime<Utc>,
}

impl From<AttemptRow> for QuizAttempt {
    fn from(row: AttemptRow) -> Self {
        QuizAttempt {
            id: row.id,
            quiz_id: row.quiz_id,
            answers: row.answers.0,
            score: row.score,
            total_questions: row.total_questions,
            submitted_at: row.submitted_at,
        }
    }
}

#[derive(Clone)]
pub struct PgQuizRepository {
    pool: PgPool,
}

impl PgQuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizRepository for PgQuizRepository {
    async fn create_quiz(&self, new_quiz: NewQuiz) -> Result<QuizWithQuestions> {
        let mut tx = self.pool.begin().await?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (id, title)
            VALUES ($1, $2)
            RETURNING id, title, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_quiz.title)
        .fetch_one(&mut *tx)
        .await?;

        let mut questions = Vec::with_capacity(new_quiz.questions.len());
        for q in &new_quiz.questions {
            let row = sqlx::query_as::<_, QuestionRow>(
                r#"
                INSERT INTO questions (id, quiz_id, question_text, question_type, options, correct_answer, "order")
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, quiz_id, question_text, question_type, options, correct_answer, "order"
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(quiz.id)
            .bind(&q.question_text)
            .bind(q.question_type.as_str())
            .bind(Json(&q.options))
            .bind(&q.correct_answer)
            .bind(q.order)
            .fetch_one(&mut *tx)
            .await?;
            questions.push(Question::try_from(row)?);
        }

        tx.commit().await?;

        Ok(QuizWithQuestions { quiz, questions })
    }

    async fn get_quiz_by_id(&self, id: Uuid) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, title, created_at FROM quizzes WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn list_questions_ordered(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, quiz_id, question_text, question_type, options, correct_answer, "order"
            FROM questions
            WHERE quiz_id = $1
            ORDER BY "order" ASC
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Question::try_from).collect()
    }

    async fn create_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt> {
        let row = sqlx::query_as::<_, AttemptRow>(
            r#"
            INSERT INTO quiz_attempts (id, quiz_id, answers, score, total_questions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, quiz_id, answers, score, total_questions, submitted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attempt.quiz_id)
        .bind(Json(&attempt.answers))
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_attempts(&self, quiz_id: Uuid) -> Result<Vec<QuizAttempt>> {
        let rows = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, quiz_id, answers, score, total_questions, submitted_at
            FROM quiz_attempts
            WHERE quiz_id = $1
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QuizAttempt::from).collect())
    }
}
