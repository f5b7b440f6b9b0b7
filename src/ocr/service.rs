//! OCR Service
//!
//! Checks uploads against the size and type limits, then relays them to the
//! first available provider.

use std::sync::Arc;

use serde_json::Value;

use super::{
    provider::{NemoRetrieverProvider, OcrProviderTrait},
    types::{OcrError, OcrImage, MAX_BASE64_LEN, MAX_IMAGE_BYTES},
};
use crate::config::OcrConfig;

/// OCR service for uploaded patta scans
pub struct OcrService {
    providers: Vec<Arc<dyn OcrProviderTrait>>,
}

impl OcrService {
    /// Create a new OCR service
    pub fn new(config: &OcrConfig, client: reqwest::Client) -> Self {
        let providers: Vec<Arc<dyn OcrProviderTrait>> = vec![Arc::new(NemoRetrieverProvider::new(
            client,
            &config.endpoint,
            config.api_key.clone(),
        ))];

        if config.api_key.is_none() {
            tracing::warn!("NVIDIA_API_KEY not set, OCR requests will fail");
        }

        Self { providers }
    }

    /// Build a service around a single provider
    pub fn with_provider(provider: Arc<dyn OcrProviderTrait>) -> Self {
        Self {
            providers: vec![provider],
        }
    }

    /// Check an upload against the accepted type and size limits
    pub fn validate(image: &OcrImage) -> Result<(), OcrError> {
        if !image.mime.starts_with("image/") {
            return Err(OcrError::NotAnImage(image.mime.clone()));
        }
        if image.bytes.len() > MAX_IMAGE_BYTES {
            return Err(OcrError::FileTooLarge(image.bytes.len()));
        }
        Ok(())
    }

    /// Validate and recognize an uploaded image
    pub async fn process(&self, image: &OcrImage) -> Result<Value, OcrError> {
        Self::validate(image)?;

        let encoded = image.base64();
        if encoded.len() > MAX_BASE64_LEN {
            return Err(OcrError::EncodedTooLarge(encoded.len()));
        }

        tracing::debug!(
            "OCR request: {} bytes of {}, {} base64 chars",
            image.bytes.len(),
            image.mime,
            encoded.len()
        );

        // Try providers in order
        let mut last_error = None;
        for provider in &self.providers {
            if !provider.is_available().await {
                continue;
            }
            match provider.recognize(image, &encoded).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!("OCR provider {:?} failed: {}", provider.provider_type(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| OcrError::ProviderNotAvailable("No OCR providers available".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::provider::MockProvider;
    use serde_json::json;

    fn service(available: bool) -> OcrService {
        OcrService::with_provider(Arc::new(MockProvider {
            response: json!({ "data": [{ "text_detections": [] }] }),
            available,
        }))
    }

    #[tokio::test]
    async fn test_process_relays_provider_output() {
        let image = OcrImage::new(vec![0u8; 1024], "image/png");
        let result = service(true).process(&image).await.unwrap();
        assert_eq!(result["data"][0]["text_detections"], json!([]));
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let image = OcrImage::new(b"%PDF".to_vec(), "application/pdf");
        let err = service(true).process(&image).await.unwrap_err();
        assert!(matches!(err, OcrError::NotAnImage(_)));
    }

    #[tokio::test]
    async fn test_size_limits() {
        let huge = OcrImage::new(vec![0u8; MAX_IMAGE_BYTES + 1], "image/jpeg");
        assert!(matches!(
            service(true).process(&huge).await.unwrap_err(),
            OcrError::FileTooLarge(_)
        ));

        // 150 000 bytes encode to 200 000 base64 chars
        let wide = OcrImage::new(vec![0u8; 150_000], "image/jpeg");
        assert!(matches!(
            service(true).process(&wide).await.unwrap_err(),
            OcrError::EncodedTooLarge(200_000)
        ));
    }

    #[tokio::test]
    async fn test_unavailable_provider() {
        let image = OcrImage::new(vec![1, 2, 3], "image/png");
        let err = service(false).process(&image).await.unwrap_err();
        assert!(matches!(err, OcrError::ProviderNotAvailable(_)));
        assert_eq!(err.status_code(), 500);
    }
}
