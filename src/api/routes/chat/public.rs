//! Public types for the chat routes
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ChatQuery {
    pub msg: String,
}
