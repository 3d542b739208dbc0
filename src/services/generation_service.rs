use crate::models::generation::{
    ErrorKind, GenerationFailure, GenerationRequest, GenerationResult,
};
use crate::services::ai_service::TextGenerator;
use crate::services::extract_service::ResponseExtractor;
use crate::services::validation_service::{McqValidator, ValidationFailed};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const DEFAULT_CONTEXT_CHAR_LIMIT: usize = 2000;

/// Prompt → model → extraction → validation. Exactly one upstream call per request
/// that passes input checks; no retries and no caching.
#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn TextGenerator>,
    context_char_limit: usize,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            context_char_limit: DEFAULT_CONTEXT_CHAR_LIMIT,
        }
    }

    pub fn with_context_char_limit(mut self, limit: usize) -> Self {
        self.context_char_limit = limit;
        self
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        if request.topic.trim().is_empty() {
            return GenerationResult::failed(ErrorKind::EmptyPrompt);
        }
        if !request.count_in_range() {
            return GenerationResult::Failed(
                GenerationFailure::new(ErrorKind::InvalidCount)
                    .with_details(format!("requested {}", request.count)),
            );
        }

        let prompt = build_prompt(request, self.context_char_limit);
        let raw = match self.generator.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Text generation failed");
                return GenerationResult::Failed(
                    GenerationFailure::new(ErrorKind::UpstreamError).with_details(e.to_string()),
                );
            }
        };
        tracing::debug!(raw = %raw, "Model response received");

        let extracted = match ResponseExtractor::extract(&raw) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Could not extract JSON from model response");
                return GenerationResult::Failed(
                    GenerationFailure::new(ErrorKind::ExtractionFailed).with_raw_text(e.raw_text),
                );
            }
        };

        let parsed: JsonValue = match serde_json::from_str(&extracted) {
            Ok(value) => value,
            Err(e) => {
                return GenerationResult::Failed(
                    GenerationFailure::new(ErrorKind::ExtractionFailed)
                        .with_raw_text(raw)
                        .with_details(e.to_string()),
                );
            }
        };

        let batch = match McqValidator::validate_batch(&parsed) {
            Ok(batch) => batch,
            Err(ValidationFailed::NotAnArray) => {
                tracing::error!("Model response is not an array");
                return GenerationResult::Failed(
                    GenerationFailure::new(ErrorKind::NotAnArray).with_raw_text(raw),
                );
            }
        };

        let mut mcqs = batch.mcqs;
        if mcqs.is_empty() {
            return GenerationResult::Failed(
                GenerationFailure::new(ErrorKind::ElementRejected)
                    .with_raw_text(raw)
                    .with_details(format!("{} element(s) rejected", batch.rejected.len())),
            );
        }

        let requested = request.count as usize;
        if mcqs.len() > requested {
            mcqs.truncate(requested);
        } else if mcqs.len() < requested {
            tracing::warn!(
                requested,
                received = mcqs.len(),
                rejected = batch.rejected.len(),
                "Model returned fewer valid questions than requested"
            );
        }

        tracing::info!(count = mcqs.len(), topic = %request.topic, "Generated MCQs");
        GenerationResult::Ok(mcqs)
    }
}

pub fn build_prompt(request: &GenerationRequest, context_char_limit: usize) -> String {
    let context = request
        .context_text
        .as_deref()
        .map(|ctx| truncate_chars(ctx.trim(), context_char_limit))
        .filter(|ctx| !ctx.is_empty())
        .map(|ctx| format!("Context:\n{}\n\n", ctx))
        .unwrap_or_default();

    format!(
        "Generate exactly {count} multiple-choice questions based on:\n\
         {context}\
         Topic: {topic}\n\
         Difficulty: {difficulty}\n\n\
         Format each as: [\"question\", [\"option1\", \"option2\", \"option3\", \"option4\"], correctIndex]\n\
         correctIndex is the 0-based position (0-3) of the correct option.\n\
         Only return a valid JSON array, no other text or markdown.",
        count = request.count,
        context = context,
        topic = request.topic.trim(),
        difficulty = request.difficulty,
    )
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::Difficulty;

    #[test]
    fn prompt_is_deterministic_and_embeds_inputs() {
        let request = GenerationRequest::new("Photosynthesis", Difficulty::Hard, 3)
            .with_context(Some("Plants convert light.".to_string()));
        let prompt = build_prompt(&request, 2000);
        assert_eq!(prompt, build_prompt(&request, 2000));
        assert!(prompt.starts_with("Generate exactly 3 multiple-choice questions"));
        assert!(prompt.contains("Context:\nPlants convert light.\n\n"));
        assert!(prompt.contains("Topic: Photosynthesis\n"));
        assert!(prompt.contains("Difficulty: hard\n"));
        assert!(prompt.ends_with("Only return a valid JSON array, no other text or markdown."));
    }

    #[test]
    fn context_is_truncated_on_char_boundary() {
        let request = GenerationRequest::new("Café", Difficulty::Easy, 1)
            .with_context(Some("ééééé".to_string()));
        let prompt = build_prompt(&request, 3);
        assert!(prompt.contains("Context:\nééé\n\n"));
    }

    #[test]
    fn blank_context_is_omitted() {
        let request =
            GenerationRequest::new("Rust", Difficulty::Medium, 1).with_context(Some("  ".into()));
        assert!(!build_prompt(&request, 2000).contains("Context:"));
    }
}
