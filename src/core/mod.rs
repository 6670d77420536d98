mod config;
mod logging;
pub use config::{AppConfig, StoreConfig};
pub use logging::init_tracing;
