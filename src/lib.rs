pub mod api;
pub mod cli;
pub mod core;
pub mod llm;
pub mod store;
