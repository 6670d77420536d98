//! Text generation for the chat service. The web layer only knows
//! about `TextGenerator`; the concrete backend is chosen at startup
//! and injected into the app state.

mod core;
mod models;

use anyhow::{Error, Result};
use async_trait::async_trait;

pub use self::core::{CompletionGenerator, completion};
pub use models::{CompletionResponse, Message, Role};

#[async_trait]
pub trait TextGenerator {
    /// Generate a reply for `context`, which is the previous bot
    /// response followed by the user's new message.
    async fn generate(&self, context: &str) -> Result<String, Error>;
}

pub type BoxedGenerator = std::sync::Arc<dyn TextGenerator + Send + Sync + 'static>;
