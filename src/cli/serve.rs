use std::sync::Arc;

use anyhow::Result;

use crate::api;
use crate::core::AppConfig;
use crate::llm::{BoxedGenerator, CompletionGenerator};

pub async fn run(host: String, port: String) -> Result<()> {
    let config = AppConfig::default();

    // The generator is created once here and shared by every request
    let generator: BoxedGenerator = Arc::new(
        CompletionGenerator::new(
            &config.llm_api_hostname,
            &config.llm_api_key,
            &config.llm_model,
        )
        .max_tokens(config.llm_max_tokens)
        .system_message(config.system_message.as_deref()),
    );

    api::serve(host, port, config, generator).await
}
