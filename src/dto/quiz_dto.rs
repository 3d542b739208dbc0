use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::generation::Difficulty;
use crate::models::mcq::Mcq;
use crate::models::quiz::Quiz;
use crate::services::session_service::QuestionView;

/// Questions arrive as raw JSON so a malformed element can be reported by index.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizPayload {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[validate(length(min = 1))]
    pub questions: Vec<JsonValue>,
}

impl CreateQuizPayload {
    /// All-or-nothing: unlike model output, a stored quiz never keeps a partial question set.
    pub fn into_quiz(self, fallback_id: String) -> Result<Quiz> {
        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Mcq::from_json(value)
                    .map_err(|reason| Error::BadRequest(format!("Question {}: {}", index, reason)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Quiz {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or(fallback_id),
            name: self.name,
            topic: self.topic,
            difficulty: self.difficulty,
            questions,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            name: quiz.name.clone(),
            topic: quiz.topic.clone(),
            difficulty: quiz.difficulty,
            question_count: quiz.questions.len(),
        }
    }
}

/// A catalog quiz as participants may see it: no correct answers.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuestionView>,
}

impl From<Quiz> for QuizView {
    fn from(quiz: Quiz) -> Self {
        let questions = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionView::of(index, q))
            .collect();
        Self {
            id: quiz.id,
            name: quiz.name,
            topic: quiz.topic,
            difficulty: quiz.difficulty,
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(questions: Vec<JsonValue>) -> CreateQuizPayload {
        CreateQuizPayload {
            id: None,
            name: "Basics".to_string(),
            topic: "Rust".to_string(),
            difficulty: Difficulty::Easy,
            questions,
        }
    }

    #[test]
    fn strict_conversion_names_bad_element() {
        let err = payload(vec![
            json!(["Q1", ["a", "b", "c", "d"], 0]),
            json!(["Q2", ["a", "b"], 0]),
        ])
        .into_quiz("quiz-1".to_string())
        .unwrap_err();
        match err {
            Error::BadRequest(msg) => assert!(msg.starts_with("Question 1:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn uses_fallback_id_when_blank() {
        let mut p = payload(vec![json!(["Q1", ["a", "b", "c", "d"], 2])]);
        p.id = Some(" ".to_string());
        let quiz = p.into_quiz("quiz-7".to_string()).unwrap();
        assert_eq!(quiz.id, "quiz-7");
        assert_eq!(quiz.questions[0].correct_option_index(), 2);
    }
}
