//! Individual scheme recommendation routes

use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::PattaDraft;
use crate::schemes::individual::{self, AdditionalInfo, IndividualProfile, IndividualScheme};
use crate::schemes::Scored;
use crate::state::AppState;

/// Create the individual schemes router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/schemes", get(list_schemes))
        .route("/schemes/:scheme_id", get(get_scheme))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    profile: IndividualProfile,
    recommended_schemes: Vec<Scored<'static, IndividualScheme>>,
}

/// Score every scheme against a patta form and the holder's extra details
async fn recommend(Json(mut body): Json<Value>) -> Result<Json<ApiResponse<Recommendation>>> {
    let extra = body
        .as_object_mut()
        .and_then(|map| map.remove("additionalInfo"))
        .filter(|v| !v.is_null());
    let info: AdditionalInfo = match extra {
        Some(v) => serde_json::from_value(v)
            .map_err(|e| AppError::BadRequest(format!("Invalid additionalInfo: {}", e)))?,
        None => AdditionalInfo::default(),
    };

    let draft = PattaDraft::from_json(body)?;
    let profile = IndividualProfile::from_draft(&draft, &info);
    let recommended_schemes = individual::recommend_default(&profile);
    tracing::debug!(
        "{} schemes recommended for {:?}",
        recommended_schemes.len(),
        profile.name
    );

    Ok(ApiResponse::ok(Recommendation {
        profile,
        recommended_schemes,
    }))
}

/// Full scheme catalog
async fn list_schemes() -> Json<ApiResponse<&'static [IndividualScheme]>> {
    ApiResponse::ok(individual::catalog())
}

/// A single scheme by id
async fn get_scheme(Path(scheme_id): Path<String>) -> Result<Json<ApiResponse<&'static IndividualScheme>>> {
    let scheme = individual::find(&scheme_id).ok_or_else(|| AppError::NotFound("Scheme not found".to_string()))?;
    Ok(ApiResponse::ok(scheme))
}
