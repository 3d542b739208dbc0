#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use mcq_backend::{
    config::Config,
    database::kv::MemoryKvStore,
    error::Result,
    routes::create_router,
    services::{ai_service::TextGenerator, reference_service::ReferenceLookup},
    AppState,
};
use mockall::mock;
use serde_json::Value as JsonValue;
use tower::ServiceExt;

mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        async fn complete(&self, prompt: &str) -> Result<String>;
    }
}

pub struct NoReference;

#[async_trait]
impl ReferenceLookup for NoReference {
    async fn lookup(&self, _topic: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: None,
        jwt_secret: "test_secret_key".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: "gemini-test".to_string(),
        gemini_base_url: "http://localhost".to_string(),
        wikipedia_api_url: "http://localhost/w/api.php".to_string(),
        generation_rps: 100,
        seconds_per_question: 60,
        context_char_limit: 2000,
        upstream_timeout_secs: 5,
        token_ttl_hours: 1,
    }
}

pub fn app_with(generator: MockGenerator) -> Router {
    let state = AppState::with_collaborators(
        Arc::new(test_config()),
        Arc::new(generator),
        Arc::new(NoReference),
        Arc::new(MemoryKvStore::new()),
    );
    create_router(state)
}

pub fn mcq_array(n: usize) -> String {
    let items: Vec<JsonValue> = (0..n)
        .map(|i| serde_json::json!([format!("Q{}", i + 1), ["a", "b", "c", "d"], i % 4]))
        .collect();
    JsonValue::Array(items).to_string()
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}
