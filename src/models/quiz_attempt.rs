use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Raw answers as submitted: question id (string form) to answer text.
pub type AnswerMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub answers: AnswerMap,
    pub score: i32,
    pub total_questions: i32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuizAttempt {
    pub quiz_id: Uuid,
    pub answers: AnswerMap,
    pub score: i32,
    pub total_questions: i32,
}
