//! OCR upload route

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::ocr::{OcrError, OcrImage, MAX_IMAGE_BYTES};
use crate::state::AppState;

/// Multipart field carrying the scan
const IMAGE_FIELD: &str = "image";

/// Create the OCR router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process", post(process_image))
        // Leave headroom above the image limit so oversized files get a clear error
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
}

/// Read the `image` field, falling back to a type guessed from the file name.
async fn read_image(mut multipart: Multipart) -> Result<OcrImage> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mime = field
            .content_type()
            .map(str::to_string)
            .or_else(|| {
                field
                    .file_name()
                    .and_then(|name| mime_guess::from_path(name).first())
                    .map(|m| m.essence_str().to_string())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        return Ok(OcrImage::new(bytes.to_vec(), mime));
    }

    Err(OcrError::MissingImage.into())
}

/// Relay an uploaded scan to the recognizer and return its raw output
async fn process_image(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Value>> {
    let image = read_image(multipart).await?;
    tracing::info!("OCR upload: {} bytes ({})", image.bytes.len(), image.mime);

    let result = state.ocr().process(&image).await?;
    Ok(Json(result))
}
