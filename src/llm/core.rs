use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use serde_json::json;

use super::TextGenerator;
use super::models::{CompletionResponse, Message, Role};

/// Request a single, non-streaming chat completion from an OpenAI
/// compatible API.
pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
    max_tokens: u32,
) -> Result<CompletionResponse, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 2))
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

/// Generates chat replies with a hosted language model.
#[derive(Clone, Debug)]
pub struct CompletionGenerator {
    api_hostname: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    system_message: Option<String>,
}

impl CompletionGenerator {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: 128,
            system_message: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn system_message(mut self, system_message: Option<&str>) -> Self {
        self.system_message = system_message.map(String::from);
        self
    }

    fn messages(&self, context: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_message) = &self.system_message {
            messages.push(Message::new(Role::System, system_message));
        }
        messages.push(Message::new(Role::User, context));
        messages
    }
}

#[async_trait]
impl TextGenerator for CompletionGenerator {
    async fn generate(&self, context: &str) -> Result<String, Error> {
        let messages = self.messages(context);
        let response = completion(
            &messages,
            &self.api_hostname,
            &self.api_key,
            &self.model,
            self.max_tokens,
        )
        .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(anyhow!("Completion response missing message content"))?;

        tracing::debug!("Generated {} chars for context: {}", content.len(), context);

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn completion_body(content: &str) -> String {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "gpt-4.1-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn it_generates_a_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4.1-mini",
                "messages": [{"role": "user", "content": "Hello there"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("  Hi! How are you?\n"))
            .create_async()
            .await;

        let generator = CompletionGenerator::new(&server.url(), "test-key", "gpt-4.1-mini");
        let reply = generator.generate("Hello there").await.unwrap();

        assert_eq!(reply, "Hi! How are you?");
    }

    #[tokio::test]
    async fn it_sends_the_system_message_first() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "max_tokens": 64,
                "messages": [
                    {"role": "system", "content": "You are Woby."},
                    {"role": "user", "content": "Who are you?"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("I am Woby."))
            .create_async()
            .await;

        let generator = CompletionGenerator::new(&server.url(), "test-key", "gpt-4.1-mini")
            .max_tokens(64)
            .system_message(Some("You are Woby."));
        let reply = generator.generate("Who are you?").await.unwrap();

        assert_eq!(reply, "I am Woby.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_fails_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let generator = CompletionGenerator::new(&server.url(), "test-key", "gpt-4.1-mini");
        let result = generator.generate("Hello").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn it_fails_when_content_is_missing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let generator = CompletionGenerator::new(&server.url(), "test-key", "gpt-4.1-mini");
        let err = generator.generate("Hello").await.unwrap_err();

        assert!(err.to_string().contains("missing message content"));
    }
}
