use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::session_dto::{DeleteResultRequest, DeleteResultResponse},
    error::{Error, Result},
    models::quiz_result::ResultKey,
    AppState,
};

#[axum::debug_handler]
pub async fn list_results(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut results = state.results.list_all().await?;
    results.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(results))
}

#[axum::debug_handler]
pub async fn delete_result(
    State(state): State<AppState>,
    Json(payload): Json<DeleteResultRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let key = ResultKey::from(payload);
    let removed = state.results.delete_by_key(&key).await?;
    if removed == 0 {
        return Err(Error::NotFound("Result not found".to_string()));
    }
    tracing::info!(quiz_id = %key.quiz_id, removed, "Result deleted");
    Ok(Json(DeleteResultResponse { removed }))
}
