use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{Error, Result};
use crate::models::question::{NewQuestion, Question, QuestionType};
use crate::models::quiz::{NewQuiz, Quiz, QuizWithQuestions};
use crate::models::quiz_attempt::{AnswerMap, QuizAttempt};
use crate::services::scoring_service::{QuestionOutcome, QuizScore};
use crate::utils::json::null_as_default;

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateQuestionPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_text: String,
    /// `mcq`/`tf` or the long names; parsed into [`QuestionType`] during validation.
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "mcq")]
    pub question_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_answer: String,
    /// Accepted for compatibility and ignored: questions are numbered by position.
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuizPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(
        length(max = 255, message = "Ensure this field has no more than 255 characters."),
        custom(function = "validate_title")
    )]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "validate_questions"))]
    pub questions: Vec<CreateQuestionPayload>,
}

impl CreateQuizPayload {
    /// Builds the insert model from a validated payload. Client `order` values
    /// are discarded and every question is numbered by its position.
    pub fn into_new_quiz(self) -> Result<NewQuiz> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(position, q)| {
                let question_type: QuestionType =
                    q.question_type.parse().map_err(Error::BadRequest)?;
                let options = if q.options.is_empty() {
                    question_type.default_options()
                } else {
                    q.options
                };
                Ok(NewQuestion {
                    question_text: q.question_text.trim().to_string(),
                    question_type,
                    options,
                    correct_answer: q.correct_answer,
                    order: position as i32,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NewQuiz {
            title: self.title.trim().to_string(),
            questions,
        })
    }
}

const MAX_ANSWER_CHARS: usize = 255;

fn validation_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

fn validate_title(title: &str) -> std::result::Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(validation_error(
            "blank",
            "This field may not be blank.".to_string(),
        ));
    }
    Ok(())
}

fn validate_questions(
    questions: &[CreateQuestionPayload],
) -> std::result::Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(validation_error(
            "empty",
            "At least one question is required.".to_string(),
        ));
    }

    for (i, q) in questions.iter().enumerate() {
        let n = i + 1;
        let question_type = match q.question_type.parse::<QuestionType>() {
            Ok(question_type) => question_type,
            Err(_) if q.question_type.is_empty() => {
                return Err(validation_error(
                    "missing_type",
                    format!("Question {}: question type is required.", n),
                ));
            }
            Err(_) => {
                return Err(validation_error(
                    "invalid_choice",
                    format!("Question {}: \"{}\" is not a valid choice.", n, q.question_type),
                ));
            }
        };

        if q.question_text.trim().is_empty() {
            return Err(validation_error(
                "blank_text",
                format!("Question {}: question text may not be blank.", n),
            ));
        }

        let options: Cow<'_, [String]> = if q.options.is_empty() {
            Cow::Owned(question_type.default_options())
        } else {
            Cow::Borrowed(q.options.as_slice())
        };

        if question_type == QuestionType::MultipleChoice && options.len() < 2 {
            return Err(validation_error(
                "too_few_options",
                format!("Question {}: MCQ questions must have at least 2 options.", n),
            ));
        }

        if q.correct_answer.chars().count() > MAX_ANSWER_CHARS {
            return Err(validation_error(
                "answer_too_long",
                format!(
                    "Question {}: correct answer may not be longer than {} characters.",
                    n, MAX_ANSWER_CHARS
                ),
            ));
        }

        if !options.iter().any(|o| *o == q.correct_answer) {
            return Err(validation_error(
                "answer_not_in_options",
                format!("Question {}: correct answer must be one of the options.", n),
            ));
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitAnswersPayload {
    /// Mapping of question id to the chosen option text.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub answers: Option<JsonValue>,
}

impl SubmitAnswersPayload {
    /// Parses a raw request body. Anything that is not a JSON object is a
    /// `BadRequest`; the shape of `answers` is checked by [`parse_answers`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|err| Error::BadRequest(format!("Invalid JSON body: {}", err)))
    }
}

/// Checks the shape of a submitted `answers` value. It must be a JSON object
/// whose values are all strings.
pub fn parse_answers(
    answers: Option<JsonValue>,
) -> std::result::Result<AnswerMap, ValidationErrors> {
    let invalid = |message: &str| {
        let mut errors = ValidationErrors::new();
        errors.add("answers", validation_error("invalid", message.to_string()));
        errors
    };

    let object = match answers {
        None | Some(JsonValue::Null) => return Err(invalid("This field is required.")),
        Some(JsonValue::Object(object)) => object,
        Some(_) => return Err(invalid("Answers must be a dictionary.")),
    };

    object
        .into_iter()
        .map(|(question_id, answer)| match answer {
            JsonValue::String(text) => Ok((question_id, text)),
            _ => Err(invalid("Every answer must be a string.")),
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Projections
// ----------------------------------------------------------------------------

/// Question as served to quiz takers. This type has no `correct_answer` field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicQuestion {
    pub id: Uuid,
    pub question_text: String,
    #[schema(value_type = String, example = "mcq")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub order: i32,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text.clone(),
            question_type: q.question_type,
            options: q.options.clone(),
            order: q.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub question_text: String,
    #[schema(value_type = String, example = "mcq")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub order: i32,
}

impl From<&Question> for QuestionResponse {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text.clone(),
            question_type: q.question_type,
            options: q.options.clone(),
            correct_answer: q.correct_answer.clone(),
            order: q.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicQuizResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<PublicQuestion>,
}

/// Quiz as returned from creation, correct answers included.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionResponse>,
}

fn sorted_by_order(questions: &[Question]) -> Vec<&Question> {
    let mut sorted: Vec<&Question> = questions.iter().collect();
    sorted.sort_by_key(|q| q.order);
    sorted
}

impl PublicQuizResponse {
    pub fn new(quiz: &Quiz, questions: &[Question]) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            created_at: quiz.created_at,
            questions: sorted_by_order(questions)
                .into_iter()
                .map(PublicQuestion::from)
                .collect(),
        }
    }
}

impl From<&QuizWithQuestions> for PublicQuizResponse {
    fn from(value: &QuizWithQuestions) -> Self {
        Self::new(&value.quiz, &value.questions)
    }
}

impl From<&QuizWithQuestions> for QuizResponse {
    fn from(value: &QuizWithQuestions) -> Self {
        Self {
            id: value.quiz.id,
            title: value.quiz.title.clone(),
            created_at: value.quiz.created_at,
            questions: sorted_by_order(&value.questions)
                .into_iter()
                .map(QuestionResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionResultResponse {
    pub question_id: Uuid,
    pub question_text: String,
    /// `null` when the question was not answered at all.
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizResultResponse {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub results: Vec<QuestionResultResponse>,
}

impl From<QuestionOutcome> for QuestionResultResponse {
    fn from(outcome: QuestionOutcome) -> Self {
        Self {
            question_id: outcome.question_id,
            question_text: outcome.question_text,
            user_answer: outcome.user_answer,
            correct_answer: outcome.correct_answer,
            is_correct: outcome.is_correct,
        }
    }
}

impl From<QuizScore> for QuizResultResponse {
    fn from(score: QuizScore) -> Self {
        Self {
            score: score.score,
            total_questions: score.total_questions,
            percentage: score.percentage,
            results: score.outcomes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizAttemptResponse {
    pub id: Uuid,
    pub quiz_id: Uuid,
    #[schema(value_type = Object)]
    pub answers: AnswerMap,
    pub score: i32,
    pub total_questions: i32,
    pub submitted_at: DateTime<Utc>,
}

impl From<QuizAttempt> for QuizAttemptResponse {
    fn from(attempt: QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            answers: attempt.answers,
            score: attempt.score,
            total_questions: attempt.total_questions,
            submitted_at: attempt.submitted_at,
        }
    }
}
