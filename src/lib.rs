pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::database::kv::KvStore;
use crate::error::Result;
use crate::services::{
    ai_service::{AIService, TextGenerator},
    auth_service::AuthService,
    catalog_service::CatalogService,
    generation_service::GenerationService,
    reference_service::{ReferenceLookup, WikipediaService},
    result_service::{KvResultStore, ResultStore},
    session_service::SessionService,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generation_service: GenerationService,
    pub reference: Arc<dyn ReferenceLookup>,
    pub session_service: SessionService,
    pub results: Arc<dyn ResultStore>,
    pub catalog: CatalogService,
    pub auth_service: AuthService,
}

impl AppState {
    /// Wires the Gemini and Wikipedia clients from `config`.
    pub fn new(config: Arc<Config>, kv: Arc<dyn KvStore>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let generator = Arc::new(AIService::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            http_client.clone(),
        ));
        let reference = Arc::new(WikipediaService::new(
            config.wikipedia_api_url.clone(),
            http_client,
        ));

        Ok(Self::with_collaborators(config, generator, reference, kv))
    }

    pub fn with_collaborators(
        config: Arc<Config>,
        generator: Arc<dyn TextGenerator>,
        reference: Arc<dyn ReferenceLookup>,
        kv: Arc<dyn KvStore>,
    ) -> Self {
        let results: Arc<dyn ResultStore> = Arc::new(KvResultStore::new(kv.clone()));
        let generation_service = GenerationService::new(generator)
            .with_context_char_limit(config.context_char_limit);
        let session_service = SessionService::new(results.clone(), config.seconds_per_question);
        let catalog = CatalogService::new(kv);
        let auth_service = AuthService::new(config.jwt_secret.clone(), config.token_ttl_hours);

        Self {
            config,
            generation_service,
            reference,
            session_service,
            results,
            catalog,
            auth_service,
        }
    }
}
