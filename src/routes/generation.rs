use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    dto::generation_dto::{GenerateMcqsRequest, GenerateMcqsResponse},
    error::Result,
    models::generation::GenerationRequest,
    AppState,
};

#[axum::debug_handler]
pub async fn generate_mcqs(
    State(state): State<AppState>,
    Json(payload): Json<GenerateMcqsRequest>,
) -> Result<impl IntoResponse> {
    let request = GenerationRequest::from(payload);
    let mcqs = state
        .generation_service
        .generate(&request)
        .await
        .into_result()?;
    Ok(Json(GenerateMcqsResponse { mcqs }))
}
