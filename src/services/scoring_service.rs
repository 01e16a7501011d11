use uuid::Uuid;

use crate::models::question::Question;
use crate::models::quiz_attempt::AnswerMap;

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutcome {
    pub question_id: Uuid,
    pub question_text: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizScore {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub outcomes: Vec<QuestionOutcome>,
}

pub struct ScoringService;

impl ScoringService {
    /// Scores `answers` against `questions`, which must already be in `order`
    /// sequence. Matching is exact: no trimming, no case folding. A missing
    /// answer is compared as `""` but reported as `None`.
    pub fn score(questions: &[Question], answers: &AnswerMap) -> QuizScore {
        let mut score: i32 = 0;
        let mut outcomes = Vec::with_capacity(questions.len());

        for q in questions {
            let submitted = answers.get(&q.id.to_string());
            let is_correct = submitted.map(String::as_str).unwrap_or("") == q.correct_answer;
            if is_correct {
                score += 1;
            }

            outcomes.push(QuestionOutcome {
                question_id: q.id,
                question_text: q.question_text.clone(),
                user_answer: submitted.cloned(),
                correct_answer: q.correct_answer.clone(),
                is_correct,
            });
        }

        let total_questions = questions.len() as i32;

        QuizScore {
            score,
            total_questions,
            percentage: percentage(score, total_questions),
            outcomes,
        }
    }
}

fn percentage(score: i32, total: i32) -> f64 {
    if total > 0 {
        score as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}
