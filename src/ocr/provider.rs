//! OCR Providers
//!
//! Defines the provider trait and the hosted NeMo Retriever implementation.

use async_trait::async_trait;
use serde_json::Value;

use super::types::{OcrError, OcrImage, OcrProvider};

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on an image, returning the provider's JSON unchanged
    async fn recognize(&self, image: &OcrImage, encoded: &str) -> Result<Value, OcrError>;
}

/// NVIDIA NeMo Retriever OCR over HTTP
pub struct NemoRetrieverProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl NemoRetrieverProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl OcrProviderTrait for NemoRetrieverProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::NemoRetriever
    }

    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn recognize(&self, image: &OcrImage, encoded: &str) -> Result<Value, OcrError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| OcrError::ProviderNotAvailable("NVIDIA_API_KEY is not set".to_string()))?;

        let payload = serde_json::json!({
            "input": [
                {
                    "type": "image_url",
                    "url": image.data_url(encoded)
                }
            ]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call OCR service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Surface the upstream `message` when there is one
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(OcrError::ApiError(format!("OCR service returned {}: {}", status, detail)));
        }

        response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub response: Value,
    pub available: bool,
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::NemoRetriever
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image: &OcrImage, _encoded: &str) -> Result<Value, OcrError> {
        Ok(self.response.clone())
    }
}
