use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::llm::BoxedGenerator;

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&shared_state))
}

// Run the server. Expects tracing to already be initialized by the
// caller.
pub async fn serve(
    host: String,
    port: String,
    config: AppConfig,
    generator: BoxedGenerator,
) -> Result<()> {
    let app_state = AppState::new(generator, config);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
