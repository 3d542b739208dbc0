mod common;

use axum::http::{Method, StatusCode};
use std::sync::Arc;

use common::{app_with, login, mcq_array, send, test_config, MockGenerator};
use mcq_backend::{
    database::kv::MemoryKvStore, error::Error, routes::create_router, AppState,
};
use serde_json::json;

#[tokio::test]
async fn generates_requested_count_in_order() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .withf(|prompt: &str| {
            prompt.starts_with("Generate exactly 3 multiple-choice questions")
                && prompt.contains("Topic: Photosynthesis")
        })
        .times(1)
        .returning(|_| Ok(mcq_array(3)));
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        Some(&token),
        Some(json!({ "prompt": "Photosynthesis", "count": 3, "difficulty": "easy" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mcqs = body["mcqs"].as_array().unwrap();
    assert_eq!(mcqs.len(), 3);
    assert_eq!(mcqs[0], json!(["Q1", ["a", "b", "c", "d"], 0]));
    assert_eq!(mcqs[2], json!(["Q3", ["a", "b", "c", "d"], 2]));
}

#[tokio::test]
async fn fenced_response_is_extracted_and_extra_items_dropped() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Ok(format!("Here you go:\n```json\n{}\n```\nEnjoy!", mcq_array(4))));
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        Some(&token),
        Some(json!({ "prompt": "Rust", "count": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mcqs = body["mcqs"].as_array().unwrap();
    assert_eq!(mcqs.len(), 2);
    assert_eq!(mcqs[1][0], "Q2");
}

#[tokio::test]
async fn out_of_range_count_never_reaches_the_model() {
    let mut generator = MockGenerator::new();
    generator.expect_complete().never();
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    for count in [0, 51] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate-mcqs",
            Some(&token),
            Some(json!({ "prompt": "Rust", "count": count })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Count must be between 1 and 50");
    }
}

#[tokio::test]
async fn empty_prompt_is_rejected() {
    let mut generator = MockGenerator::new();
    generator.expect_complete().never();
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        Some(&token),
        Some(json!({ "prompt": "   ", "count": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");
}

#[tokio::test]
async fn non_array_response_is_a_server_error_with_details() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Ok(r#"{"question": "What?"}"#.to_string()));
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        Some(&token),
        Some(json!({ "prompt": "Rust", "count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model response is not an array");
    assert!(body["details"].as_str().unwrap().starts_with("Failed to process"));
}

#[tokio::test]
async fn prose_without_json_fails_extraction() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Ok("Sorry, I cannot help with that.".to_string()));
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        Some(&token),
        Some(json!({ "prompt": "Rust", "count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Could not find JSON in the model response");
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Err(Error::Upstream("Gemini API Error 503".to_string())));
    let app = app_with(generator);
    let token = login(&app, "user", "user123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        Some(&token),
        Some(json!({ "prompt": "Rust", "count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["details"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn generation_is_open_to_anonymous_callers() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Ok(mcq_array(1)));
    let app = app_with(generator);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        None,
        Some(json!({ "prompt": "Rust", "count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mcqs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_upstream_does_not_leak_the_api_key() {
    let mut config = test_config();
    config.gemini_api_key = "SECRET-GEMINI-KEY".to_string();
    config.gemini_base_url = "http://127.0.0.1:1".to_string();
    let state = AppState::new(Arc::new(config), Arc::new(MemoryKvStore::new())).unwrap();
    let app = create_router(state);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        None,
        Some(json!({ "prompt": "Rust", "count": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Text generation service failed");
    let rendered = body.to_string();
    assert!(!rendered.contains("SECRET-GEMINI-KEY"), "{rendered}");
    assert!(!rendered.contains("127.0.0.1:1"), "{rendered}");
}

#[tokio::test]
async fn all_rejected_elements_fail_instead_of_returning_an_empty_set() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Ok(r#"[["bad"], ["Q", ["a"], 0]]"#.to_string()));
    let app = app_with(generator);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        None,
        Some(json!({ "prompt": "Rust", "count": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model response contained no valid questions");
    assert_eq!(body["details"], "2 element(s) rejected");
}

#[tokio::test]
async fn empty_array_fails_as_rejected() {
    let mut generator = MockGenerator::new();
    generator
        .expect_complete()
        .times(1)
        .returning(|_| Ok("[]".to_string()));
    let app = app_with(generator);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-mcqs",
        None,
        Some(json!({ "prompt": "Rust", "count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model response contained no valid questions");
    assert_eq!(body["details"], "0 element(s) rejected");
}
