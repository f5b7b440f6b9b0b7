//! OCR-to-form assistance routes

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::ocr::{map_ocr_to_form, PattaFormData};
use crate::state::AppState;

/// Create the AI router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patta-mapper", post(reconcile_draft))
        .route("/patta-draft", post(rule_based_draft))
        .route("/patta-form", post(resolve_form))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperRequest {
    #[serde(default)]
    ocr_result: Value,
    #[serde(default)]
    draft_form_data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest {
    #[serde(default)]
    ocr_result: Value,
}

/// Let the model correct a client-supplied draft against the OCR output
async fn reconcile_draft(State(state): State<AppState>, Json(req): Json<MapperRequest>) -> Result<Json<Value>> {
    let form = state
        .assistant()
        .reconcile(&req.ocr_result, &req.draft_form_data)
        .await?;
    Ok(Json(form))
}

/// Rule-based form draft only
async fn rule_based_draft(Json(req): Json<OcrRequest>) -> Json<PattaFormData> {
    Json(map_ocr_to_form(&req.ocr_result))
}

/// Rule-based draft refined by the model, or the draft alone if that fails
async fn resolve_form(State(state): State<AppState>, Json(req): Json<OcrRequest>) -> Result<Json<Value>> {
    let form = state.assistant().resolve_form(&req.ocr_result).await?;
    Ok(Json(form))
}
