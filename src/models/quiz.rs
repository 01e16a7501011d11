use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::question::{NewQuestion, Question};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A quiz and its questions, stored and loaded as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizWithQuestions {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// Validated input for a quiz insert. Question `order` values are already final.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuiz {
    pub title: String,
    pub questions: Vec<NewQuestion>,
}
