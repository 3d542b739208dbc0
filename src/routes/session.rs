use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::session_dto::{
        AdvanceRequest, SaveAnswerRequest, StartMockSessionRequest, StartQuizSessionRequest,
    },
    error::Result,
    models::{generation::GenerationRequest, session::SessionMeta},
    services::reference_service::reference_context,
    utils::time,
    AppState,
};

/// Generates a fresh question set for `topic` and starts a timed session on it.
#[axum::debug_handler]
pub async fn start_mock_session(
    State(state): State<AppState>,
    Json(payload): Json<StartMockSessionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let topic = payload.topic.trim().to_string();

    let context = if payload.use_reference {
        reference_context(state.reference.as_ref(), &topic).await
    } else {
        None
    };
    let request = GenerationRequest::new(topic.clone(), payload.difficulty, payload.question_count)
        .with_context(context);
    let questions = state
        .generation_service
        .generate(&request)
        .await
        .into_result()?;

    let meta = SessionMeta {
        quiz_id: time::mock_quiz_id(time::now()),
        quiz_name: format!("Mock Quiz: {}", topic),
        topic: Some(topic),
        difficulty: Some(payload.difficulty),
    };
    let snapshot = state.session_service.start(questions, meta)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[axum::debug_handler]
pub async fn start_quiz_session(
    State(state): State<AppState>,
    Json(payload): Json<StartQuizSessionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.catalog.get(&payload.quiz_id).await?;
    let meta = quiz.session_meta();
    let snapshot = state.session_service.start(quiz.questions, meta)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.session_service.snapshot(id).await?))
}

#[axum::debug_handler]
pub async fn save_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveAnswerRequest>,
) -> Result<impl IntoResponse> {
    let snapshot = state
        .session_service
        .select_option(id, payload.question_index, payload.option_index)
        .await?;
    Ok(Json(snapshot))
}

#[axum::debug_handler]
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<impl IntoResponse> {
    Ok(Json(
        state.session_service.advance(id, payload.direction).await?,
    ))
}

#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.session_service.submit(id).await?))
}

#[axum::debug_handler]
pub async fn abandon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.session_service.abandon(id)?;
    Ok(StatusCode::NO_CONTENT)
}
