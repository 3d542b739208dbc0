use crate::models::generation::{ErrorKind, GenerationFailure};
use crate::services::session_engine::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Generation failed: {0}")]
    Generation(GenerationFailure),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GenerationFailure> for Error {
    fn from(failure: GenerationFailure) -> Self {
        Error::Generation(failure)
    }
}

fn generation_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::EmptyPrompt | ErrorKind::InvalidCount => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamError => StatusCode::BAD_GATEWAY,
        ErrorKind::ExtractionFailed | ErrorKind::NotAnArray | ErrorKind::ElementRejected => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn session_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NoQuestions
        | SessionError::QuestionOutOfRange { .. }
        | SessionError::OptionOutOfRange { .. } => StatusCode::BAD_REQUEST,
        SessionError::UnansweredQuestions { .. } | SessionError::AlreadySubmitted => {
            StatusCode::CONFLICT
        }
        SessionError::NotFound => StatusCode::NOT_FOUND,
        SessionError::Closed => StatusCode::GONE,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, details) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Token(err) => (StatusCode::UNAUTHORIZED, err.to_string(), None),
            Error::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg, None),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err.without_url()),
                None,
            ),
            Error::Generation(failure) => {
                let status = generation_status(failure.kind);
                let details = failure.details.or_else(|| {
                    status.is_server_error().then(|| {
                        "Failed to process the model response. Please try again with a different prompt."
                            .to_string()
                    })
                });
                (status, failure.kind.to_string(), details)
            }
            Error::Session(err) => (session_status(&err), err.to_string(), None),
            Error::Database(err) => {
                tracing::error!(error = ?err, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string(), None)
            }
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
                None,
            ),
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };
        (status, Json(body)).into_response()
    }
}
