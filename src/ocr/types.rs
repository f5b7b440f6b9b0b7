//! OCR Types
//!
//! Uploaded images, the detection shape returned by the recognizer, and errors.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest accepted upload, in bytes
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Largest base64 payload the recognizer accepts inline
pub const MAX_BASE64_LEN: usize = 180_000;

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrProvider {
    /// NVIDIA NeMo Retriever OCR (hosted)
    NemoRetriever,
}

/// An uploaded image with its content type
#[derive(Debug, Clone)]
pub struct OcrImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl OcrImage {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>` URL for an already encoded payload
    pub fn data_url(&self, encoded: &str) -> String {
        format!("data:{};base64,{}", self.mime, encoded)
    }
}

/// Recognizer response: `{"data": [{"text_detections": [...]}]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub data: Vec<OcrPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub text_detections: Vec<TextDetection>,
}

impl OcrPage {
    fn from_value(page: &Value) -> Self {
        let text_detections = page
            .get("text_detections")
            .and_then(Value::as_array)
            .map(|detections| detections.iter().map(TextDetection::from_value).collect())
            .unwrap_or_default();
        Self { text_detections }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextDetection {
    #[serde(default)]
    pub text_prediction: TextPrediction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Value>,
}

impl TextDetection {
    fn from_value(detection: &Value) -> Self {
        let prediction = detection.get("text_prediction");
        Self {
            text_prediction: TextPrediction {
                text: prediction
                    .and_then(|p| p.get("text"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                confidence: prediction.and_then(|p| p.get("confidence")).and_then(Value::as_f64),
            },
            bounding_box: detection.get("bounding_box").filter(|b| !b.is_null()).cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextPrediction {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl OcrResponse {
    /// Read the detection list out of arbitrary JSON. Each detection is read
    /// on its own: a malformed entry keeps its slot with empty text.
    pub fn from_value(value: &Value) -> Self {
        let data = value
            .get("data")
            .and_then(Value::as_array)
            .map(|pages| pages.iter().map(OcrPage::from_value).collect())
            .unwrap_or_default();
        Self { data }
    }

    /// Detected texts of the first page, in reading order
    pub fn first_page_texts(&self) -> Vec<&str> {
        self.data
            .first()
            .map(|page| {
                page.text_detections
                    .iter()
                    .map(|d| d.text_prediction.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Only image files are allowed")]
    NotAnImage(String),

    #[error("File too large. Maximum size is 2MB")]
    FileTooLarge(usize),

    #[error("Image size too large. Maximum size is approximately 180KB when base64 encoded.")]
    EncodedTooLarge(usize),

    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::MissingImage | Self::NotAnImage(_) | Self::FileTooLarge(_) | Self::EncodedTooLarge(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ProviderNotAvailable(_) | Self::ApiError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_url() {
        let image = OcrImage::new(b"abc".to_vec(), "image/png");
        let encoded = image.base64();
        assert_eq!(encoded, "YWJj");
        assert_eq!(image.data_url(&encoded), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_first_page_texts() {
        let value = json!({
            "data": [{
                "text_detections": [
                    { "text_prediction": { "text": "Patta No: 12", "confidence": 0.9 } },
                    { "text_prediction": { "text": "District" } },
                    { "bounding_box": { "points": [] } }
                ]
            }]
        });
        let response = OcrResponse::from_value(&value);
        assert_eq!(response.first_page_texts(), vec!["Patta No: 12", "District", ""]);
    }

    #[test]
    fn test_unexpected_shape_is_empty() {
        assert!(OcrResponse::from_value(&json!({ "data": "nope" })).first_page_texts().is_empty());
        assert!(OcrResponse::from_value(&json!(null)).first_page_texts().is_empty());
    }

    #[test]
    fn test_malformed_detection_keeps_its_slot() {
        let value = json!({
            "data": [{
                "text_detections": [
                    { "text_prediction": { "text": "Patta No: TR-9", "confidence": "high" } },
                    { "text_prediction": { "text": null } },
                    { "text_prediction": null },
                    null,
                    { "text_prediction": { "text": "District: Dhalai" } }
                ]
            }]
        });
        let response = OcrResponse::from_value(&value);
        assert_eq!(
            response.first_page_texts(),
            vec!["Patta No: TR-9", "", "", "", "District: Dhalai"]
        );
        assert_eq!(response.data[0].text_detections[0].text_prediction.confidence, None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(OcrError::MissingImage.status_code(), 400);
        assert_eq!(OcrError::ApiError("x".into()).status_code(), 500);
        assert_eq!(OcrError::ProviderNotAvailable("x".into()).status_code(), 500);
    }
}
