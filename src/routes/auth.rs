use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state
        .auth_service
        .login(&payload.username, &payload.password)?;
    Ok(Json(AuthResponse::from(session)))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.auth_service.register(
        payload.username.trim(),
        payload.first_name.trim(),
        payload.last_name.trim(),
    )?;
    Ok(Json(AuthResponse::from(session)))
}
