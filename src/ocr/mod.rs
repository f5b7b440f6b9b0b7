//! OCR Module
//!
//! Relays uploaded patta scans to a hosted recognizer and turns the returned
//! detections into a patta form draft.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use van_niti_server::ocr::{map_ocr_to_form, OcrImage, OcrService};
//!
//! let service = OcrService::new(&config.ocr, reqwest::Client::new());
//! let result = service.process(&OcrImage::new(bytes, "image/jpeg")).await?;
//! let form = map_ocr_to_form(&result);
//! ```

mod mapper;
mod provider;
mod service;
pub mod text;
mod types;

pub use mapper::{map_ocr_to_form, PattaFormData, KNOWN_DISTRICTS, KNOWN_VILLAGES};
pub use provider::{NemoRetrieverProvider, OcrProviderTrait};
pub use service::OcrService;
pub use types::{
    OcrError, OcrImage, OcrPage, OcrProvider, OcrResponse, TextDetection, TextPrediction, MAX_BASE64_LEN,
    MAX_IMAGE_BYTES,
};
