pub mod auth;
pub mod generation;
pub mod health;
pub mod quiz;
pub mod results;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{
        auth::{require_admin, require_bearer_auth},
        rate_limit::{rps_middleware, RateLimiter},
    },
    AppState,
};

pub fn create_router(state: AppState) -> Router {
    let limiter = RateLimiter::new(state.config.generation_rps);

    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register));

    let generation_api = Router::new()
        .route("/api/generate-mcqs", post(generation::generate_mcqs))
        .layer(from_fn_with_state(limiter.clone(), rps_middleware));

    let mock_session_api = Router::new()
        .route("/api/sessions/mock", post(session::start_mock_session))
        .layer(from_fn_with_state(limiter, rps_middleware));

    let session_api = Router::new()
        .route("/api/sessions", post(session::start_quiz_session))
        .route(
            "/api/sessions/:id",
            get(session::get_session).delete(session::abandon),
        )
        .route("/api/sessions/:id/answer", patch(session::save_answer))
        .route("/api/sessions/:id/advance", post(session::advance))
        .route("/api/sessions/:id/submit", post(session::submit))
        .route(
            "/api/results",
            get(results::list_results).delete(results::delete_result),
        )
        .route("/api/quizzes", get(quiz::list_quizzes))
        .route("/api/quizzes/:id", get(quiz::get_quiz))
        .merge(mock_session_api)
        .layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let admin_api = Router::new()
        .route("/api/quizzes", post(quiz::create_quiz))
        .route("/api/quizzes/:id", axum::routing::delete(quiz::delete_quiz))
        .layer(from_fn_with_state(state.clone(), require_admin));

    base_routes
        .merge(generation_api)
        .merge(session_api)
        .merge(admin_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
