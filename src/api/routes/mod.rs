//! Routes module

pub mod chat;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Landing page and chat query routes
        .merge(chat::router())
}
