use crate::models::generation::Difficulty;
use crate::models::mcq::Mcq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Active,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

/// Identity and labels copied onto the result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub quiz_id: String,
    pub quiz_name: String,
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub questions: Vec<Mcq>,
    pub current_index: usize,
    pub selected_option_by_question: Vec<Option<usize>>,
    pub remaining_seconds: u32,
    pub phase: Phase,
}

impl SessionState {
    pub fn unanswered_count(&self) -> usize {
        self.selected_option_by_question
            .iter()
            .filter(|s| s.is_none())
            .count()
    }
}
