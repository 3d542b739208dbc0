use crate::models::mcq::{ElementRejection, Mcq};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailed {
    #[error("parsed value is not an array")]
    NotAnArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedElement {
    pub index: usize,
    pub reason: ElementRejection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub mcqs: Vec<Mcq>,
    pub rejected: Vec<RejectedElement>,
}

/// Strict about the overall shape, lenient per element: malformed items are dropped
/// and logged, never coerced.
pub struct McqValidator;

impl McqValidator {
    pub fn validate(parsed: &JsonValue) -> Result<Vec<Mcq>, ValidationFailed> {
        Self::validate_batch(parsed).map(|batch| batch.mcqs)
    }

    pub fn validate_batch(parsed: &JsonValue) -> Result<ValidatedBatch, ValidationFailed> {
        let items = parsed.as_array().ok_or(ValidationFailed::NotAnArray)?;

        let mut batch = ValidatedBatch::default();
        for (index, item) in items.iter().enumerate() {
            match Mcq::from_json(item) {
                Ok(mcq) => batch.mcqs.push(mcq),
                Err(reason) => {
                    tracing::warn!(index, %reason, "Rejected MCQ element");
                    batch.rejected.push(RejectedElement { index, reason });
                }
            }
        }
        Ok(batch)
    }
}
