use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub order: i32,
}

/// Wire and storage values are `mcq` / `tf`; the long names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "mcq", alias = "multiple_choice")]
    MultipleChoice,
    #[serde(rename = "tf", alias = "true_false")]
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "mcq",
            QuestionType::TrueFalse => "tf",
        }
    }

    /// Options a true/false question gets when the caller sends none.
    pub fn default_options(&self) -> Vec<String> {
        match self {
            QuestionType::MultipleChoice => Vec::new(),
            QuestionType::TrueFalse => vec!["True".to_string(), "False".to_string()],
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" | "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "tf" | "true_false" => Ok(QuestionType::TrueFalse),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}
