use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no JSON payload found in model response")]
pub struct ExtractionFailed {
    pub raw_text: String,
}

type Strategy = fn(&str) -> Option<String>;

/// Recovery strategies, cheapest first. A strategy only succeeds with text that parses as JSON.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct", direct_json),
    ("fenced_block", fenced_block),
    ("bracketed_array", bracketed_array),
];

pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn extract(raw_text: &str) -> Result<String, ExtractionFailed> {
        for (name, strategy) in STRATEGIES {
            if let Some(candidate) = strategy(raw_text) {
                tracing::debug!(strategy = name, "Extracted JSON from model response");
                return Ok(candidate);
            }
        }
        Err(ExtractionFailed {
            raw_text: raw_text.to_string(),
        })
    }
}

fn parses(candidate: &str) -> Option<String> {
    serde_json::from_str::<JsonValue>(candidate)
        .ok()
        .map(|_| candidate.to_string())
}

fn direct_json(raw: &str) -> Option<String> {
    parses(raw.trim())
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[^\S\n]*\n?(.*?)```").expect("fence pattern is valid")
    })
}

fn fenced_block(raw: &str) -> Option<String> {
    fence_re()
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| parses(body.as_str().trim()))
}

fn array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"))
}

fn bracketed_array(raw: &str) -> Option<String> {
    array_re().find(raw).and_then(|m| parses(m.as_str()))
}
