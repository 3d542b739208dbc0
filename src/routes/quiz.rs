use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::quiz_dto::{CreateQuizPayload, QuizSummary, QuizView},
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let quizzes = state.catalog.list().await?;
    Ok(Json(
        quizzes.iter().map(QuizSummary::from).collect::<Vec<_>>(),
    ))
}

/// Admins get the full quiz; everyone else gets the questions without answers.
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Response> {
    let quiz = state.catalog.get(&id).await?;
    if claims.is_admin() {
        return Ok(Json(quiz).into_response());
    }
    Ok(Json(QuizView::from(quiz)).into_response())
}

#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = payload.into_quiz(format!("quiz-{}", Uuid::new_v4()))?;
    let quiz = state.catalog.save(quiz).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.catalog.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
