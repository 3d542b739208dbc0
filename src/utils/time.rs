use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Synthesized id for sessions that do not come from the catalog.
pub fn mock_quiz_id(at: DateTime<Utc>) -> String {
    format!("mock-{}", at.timestamp_millis())
}
