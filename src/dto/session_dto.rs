use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::generation::Difficulty;
use crate::models::quiz_result::ResultKey;
use crate::models::session::Direction;

fn default_question_count() -> i64 {
    5
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartMockSessionRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_question_count")]
    #[validate(range(min = 1, max = 50))]
    pub question_count: i64,
    #[serde(default = "default_true")]
    pub use_reference: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartQuizSessionRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveAnswerRequest {
    pub question_index: usize,
    pub option_index: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvanceRequest {
    pub direction: Direction,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteResultRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub quiz_name: String,
}

impl From<DeleteResultRequest> for ResultKey {
    fn from(payload: DeleteResultRequest) -> Self {
        ResultKey {
            quiz_id: payload.quiz_id,
            date: payload.date,
            quiz_name: payload.quiz_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResultResponse {
    pub removed: usize,
}
