//! Test utilities for integration tests
#![allow(dead_code)]

use std::env;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};

use woby::api::AppState;
use woby::api::app;
use woby::core::AppConfig;
use woby::llm::{BoxedGenerator, TextGenerator};
use woby::store::DocumentStore;

/// Generator that records every context it is asked about and
/// replies with a numbered response.
#[derive(Default)]
pub struct RecordingGenerator {
    pub contexts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, context: &str) -> Result<String> {
        let mut contexts = self.contexts.lock().unwrap();
        contexts.push(context.to_string());
        Ok(format!("reply {}", contexts.len()))
    }
}

/// Generator that always fails, e.g. when the model backend is down.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _context: &str) -> Result<String> {
        Err(anyhow!("model backend unavailable"))
    }
}

/// Generator that fails on its first call and then behaves like
/// `RecordingGenerator`, e.g. a model backend that recovers.
#[derive(Default)]
pub struct FlakyGenerator {
    pub contexts: Mutex<Vec<String>>,
    failed: Mutex<bool>,
}

#[async_trait]
impl TextGenerator for FlakyGenerator {
    async fn generate(&self, context: &str) -> Result<String> {
        let mut failed = self.failed.lock().unwrap();
        if !*failed {
            *failed = true;
            return Err(anyhow!("model backend unavailable"));
        }
        let mut contexts = self.contexts.lock().unwrap();
        contexts.push(context.to_string());
        Ok(format!("reply {}", contexts.len()))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        app_title: String::from("Woby"),
        llm_api_hostname: String::from("http://localhost:9999"),
        llm_api_key: String::from("test-api-key"),
        llm_model: String::from("gpt-4.1-mini"),
        llm_max_tokens: 16,
        system_message: None,
        session_ttl: Duration::from_secs(3600),
        max_sessions: 100,
    }
}

/// Creates a test application router around the given generator.
pub fn test_app_with(generator: BoxedGenerator) -> Router {
    let app_state = AppState::new(generator, test_config());
    app(Arc::new(RwLock::new(app_state)))
}

/// Creates a test application router and returns the shared state so
/// tests can inspect the session store.
pub fn test_app_with_state(
    generator: BoxedGenerator,
    config: AppConfig,
) -> (Router, Arc<RwLock<AppState>>) {
    let state = Arc::new(RwLock::new(AppState::new(generator, config)));
    (app(Arc::clone(&state)), state)
}

/// Creates a test application router and returns the generator so
/// tests can inspect what it was called with.
pub fn test_app() -> (Router, Arc<RecordingGenerator>) {
    let generator = Arc::new(RecordingGenerator::default());
    let app = test_app_with(generator.clone());
    (app, generator)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Opens a store against the server named by `WOBY_TEST_MONGODB_HOST`
/// (and optionally `WOBY_TEST_MONGODB_PORT`) using a collection unique
/// to the test. Panics when no test server is configured, so tests
/// using it are marked `#[ignore]` and run with `--ignored`.
///
/// Tests using this fixture share a database so add a `#[serial]` to
/// the test function.
pub async fn test_store(collection: &str) -> DocumentStore {
    let host = env::var("WOBY_TEST_MONGODB_HOST")
        .expect("WOBY_TEST_MONGODB_HOST must point at a MongoDB server");
    let port = env::var("WOBY_TEST_MONGODB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(27017);

    let store = DocumentStore::open(
        &host,
        port,
        "woby_test",
        collection,
        None,
        Duration::from_secs(5),
    )
    .await
    .expect("Failed to connect to test MongoDB");

    // Start every test from an empty collection
    store
        .delete_documents(bson::Document::new(), woby::store::DeleteScope::All)
        .await
        .expect("Failed to clear test collection");

    store
}
