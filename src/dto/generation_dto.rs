use serde::{Deserialize, Serialize};

use crate::models::generation::{Difficulty, GenerationRequest};
use crate::models::mcq::Mcq;

pub const DEFAULT_COUNT: i64 = 10;

fn default_count() -> i64 {
    DEFAULT_COUNT
}

/// Range checks live in the generation pipeline so that a bad count maps to
/// `invalid_count` rather than a generic validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMcqsRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub context: Option<String>,
}

impl From<GenerateMcqsRequest> for GenerationRequest {
    fn from(payload: GenerateMcqsRequest) -> Self {
        GenerationRequest::new(payload.prompt, payload.difficulty, payload.count)
            .with_context(payload.context)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMcqsResponse {
    pub mcqs: Vec<Mcq>,
}
