use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const OPTION_COUNT: usize = 4;

/// A multiple-choice question with exactly four options.
///
/// On the wire an MCQ is the tuple `[questionText, [o1, o2, o3, o4], correctIndex]`.
/// Deserialization runs the same structural checks as [`Mcq::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "McqTuple")]
pub struct Mcq {
    question_text: String,
    options: [String; OPTION_COUNT],
    correct_option_index: usize,
}

#[derive(Serialize)]
struct McqTuple(String, [String; OPTION_COUNT], usize);

impl From<Mcq> for McqTuple {
    fn from(mcq: Mcq) -> Self {
        McqTuple(mcq.question_text, mcq.options, mcq.correct_option_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementRejection {
    #[error("element is not a 3-element array")]
    NotATriple,
    #[error("question text must be a non-empty string")]
    BadQuestionText,
    #[error("options must be an array of 4 strings")]
    BadOptions,
    #[error("correct index must be an integer between 0 and 3")]
    BadCorrectIndex,
}

impl Mcq {
    pub fn new(
        question_text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_option_index: usize,
    ) -> Result<Self, ElementRejection> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() {
            return Err(ElementRejection::BadQuestionText);
        }
        if correct_option_index >= OPTION_COUNT {
            return Err(ElementRejection::BadCorrectIndex);
        }
        Ok(Self {
            question_text,
            options,
            correct_option_index,
        })
    }

    /// Checks one parsed element against the `[text, [4 strings], index]` shape.
    pub fn from_json(value: &JsonValue) -> Result<Self, ElementRejection> {
        let items = match value.as_array() {
            Some(items) if items.len() == 3 => items,
            _ => return Err(ElementRejection::NotATriple),
        };

        let question_text = items[0]
            .as_str()
            .ok_or(ElementRejection::BadQuestionText)?;

        let raw_options = items[1]
            .as_array()
            .filter(|opts| opts.len() == OPTION_COUNT)
            .ok_or(ElementRejection::BadOptions)?;
        let mut options: [String; OPTION_COUNT] = Default::default();
        for (slot, raw) in options.iter_mut().zip(raw_options) {
            *slot = raw.as_str().ok_or(ElementRejection::BadOptions)?.to_string();
        }

        let correct = items[2]
            .as_u64()
            .filter(|idx| *idx < OPTION_COUNT as u64)
            .ok_or(ElementRejection::BadCorrectIndex)?;

        Self::new(question_text, options, correct as usize)
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }
}

impl TryFrom<JsonValue> for Mcq {
    type Error = ElementRejection;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Mcq::from_json(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_wire_tuple() {
        let mcq = Mcq::from_json(&json!(["Q", ["a", "b", "c", "d"], 2])).unwrap();
        assert_eq!(
            serde_json::to_value(&mcq).unwrap(),
            json!(["Q", ["a", "b", "c", "d"], 2])
        );
        assert_eq!(mcq.correct_option(), "c");
    }

    #[test]
    fn rejects_index_that_would_wrap_when_narrowed() {
        assert_eq!(
            Mcq::from_json(&json!(["Q", ["a", "b", "c", "d"], 4_294_967_297u64])),
            Err(ElementRejection::BadCorrectIndex)
        );
        assert_eq!(
            Mcq::from_json(&json!(["Q", ["a", "b", "c", "d"], u64::MAX])),
            Err(ElementRejection::BadCorrectIndex)
        );
    }

    #[test]
    fn rejects_float_index_and_blank_question() {
        assert_eq!(
            Mcq::from_json(&json!(["Q", ["a", "b", "c", "d"], 1.0])),
            Err(ElementRejection::BadCorrectIndex)
        );
        assert_eq!(
            Mcq::from_json(&json!(["  ", ["a", "b", "c", "d"], 1])),
            Err(ElementRejection::BadQuestionText)
        );
        assert_eq!(
            Mcq::from_json(&json!(["Q", ["a", "b", 3, "d"], 1])),
            Err(ElementRejection::BadOptions)
        );
    }

    #[test]
    fn deserialize_enforces_shape() {
        let bad: Result<Mcq, _> = serde_json::from_value(json!(["Q", ["a", "b", "c"], 0]));
        assert!(bad.is_err());
    }
}
