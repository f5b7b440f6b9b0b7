//! Chat completion providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::AssistError;

/// A model that answers a system + user prompt with a JSON object string
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, AssistError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Groq's OpenAI-compatible chat completions endpoint
pub struct GroqProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl GroqProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AssistError> {
        let api_key = self.api_key.as_deref().ok_or(AssistError::NotConfigured)?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistError::Api(format!("Failed to call completion API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Api(format!("Completion API returned {}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistError::Api(format!("Failed to parse completion: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| "{}".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "llama-3.1-8b-instant",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["temperature"], 0.0);
    }

    #[test]
    fn test_response_without_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let provider = GroqProvider::new(reqwest::Client::new(), "http://localhost:1", None, "m");
        let err = provider.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, AssistError::NotConfigured));
    }
}
