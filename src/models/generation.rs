use crate::models::mcq::Mcq;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_COUNT: i64 = 1;
pub const MAX_COUNT: i64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub count: i64,
    pub context_text: Option<String>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, count: i64) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            count,
            context_text: None,
        }
    }

    pub fn with_context(mut self, context_text: Option<String>) -> Self {
        self.context_text = context_text;
        self
    }

    pub fn count_in_range(&self) -> bool {
        (MIN_COUNT..=MAX_COUNT).contains(&self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Prompt is required")]
    EmptyPrompt,
    #[error("Count must be between 1 and 50")]
    InvalidCount,
    #[error("Text generation service failed")]
    UpstreamError,
    #[error("Could not find JSON in the model response")]
    ExtractionFailed,
    #[error("Model response is not an array")]
    NotAnArray,
    #[error("Model response contained no valid questions")]
    ElementRejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: ErrorKind,
    pub raw_text: Option<String>,
    pub details: Option<String>,
}

impl GenerationFailure {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            raw_text: None,
            details: None,
        }
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = Some(raw_text.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.kind, details),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Ok(Vec<Mcq>),
    Failed(GenerationFailure),
}

impl GenerationResult {
    pub fn failed(kind: ErrorKind) -> Self {
        GenerationResult::Failed(GenerationFailure::new(kind))
    }

    pub fn into_result(self) -> std::result::Result<Vec<Mcq>, GenerationFailure> {
        match self {
            GenerationResult::Ok(mcqs) => Ok(mcqs),
            GenerationResult::Failed(failure) => Err(failure),
        }
    }
}
