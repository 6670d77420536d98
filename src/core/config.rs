use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the chat web service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub app_title: String,
    pub llm_api_hostname: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub system_message: Option<String>,
    /// Idle time after which a session's chat history is dropped.
    pub session_ttl: Duration,
    /// Upper bound on sessions held in memory at once.
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let app_title = env::var("WOBY_APP_TITLE").unwrap_or_else(|_| "Woby".to_string());
        let llm_api_hostname = env::var("WOBY_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let llm_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let llm_model = env::var("WOBY_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let llm_max_tokens = env::var("WOBY_LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(128);
        let system_message = env::var("WOBY_SYSTEM_MESSAGE").ok();
        let session_ttl_secs = env::var("WOBY_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);
        let max_sessions = env::var("WOBY_MAX_SESSIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Self {
            app_title,
            llm_api_hostname,
            llm_api_key,
            llm_model,
            llm_max_tokens,
            system_message,
            session_ttl: Duration::from_secs(session_ttl_secs),
            max_sessions,
        }
    }
}

/// Connection settings for the document store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
    pub log_path: Option<PathBuf>,
    pub server_selection_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let host = env::var("WOBY_MONGODB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("WOBY_MONGODB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(27017);
        let database = env::var("WOBY_MONGODB_DATABASE").unwrap_or_else(|_| "woby".to_string());
        let collection =
            env::var("WOBY_MONGODB_COLLECTION").unwrap_or_else(|_| "documents".to_string());
        let log_path = env::var("WOBY_MONGODB_LOG_PATH").ok().map(PathBuf::from);
        let timeout_secs = env::var("WOBY_MONGODB_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            host,
            port,
            database,
            collection,
            log_path,
            server_selection_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
