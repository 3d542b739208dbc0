use crate::models::generation::Difficulty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReview {
    pub question: String,
    pub selected_option: Option<usize>,
    pub correct_option: usize,
    pub selected: Option<String>,
    pub correct: String,
    pub is_correct: bool,
}

/// A completed session, as stored in the result history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub quiz_name: String,
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub date: DateTime<Utc>,
    pub score: usize,
    pub total: usize,
    pub answers: Vec<AnswerReview>,
}

impl QuizResult {
    pub fn key(&self) -> ResultKey {
        ResultKey {
            quiz_id: self.quiz_id.clone(),
            date: self.date,
            quiz_name: self.quiz_name.clone(),
        }
    }
}

/// Stored results carry no surrogate id; they are told apart by this triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultKey {
    pub quiz_id: String,
    pub date: DateTime<Utc>,
    pub quiz_name: String,
}

impl ResultKey {
    pub fn matches(&self, result: &QuizResult) -> bool {
        result.quiz_id == self.quiz_id
            && result.date == self.date
            && result.quiz_name == self.quiz_name
    }
}
