//! Patta API routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{non_empty, ApiResponse};
use crate::db::{PattaQuery, PattaRepository};
use crate::error::{AppError, Result};
use crate::geo::GeoPoint;
use crate::models::{merge_json, Patta, PattaDraft, PattaStatus, PattaSummary, SYSTEM_USER_ID};
use crate::schemes::individual::{self, AdditionalInfo, IndividualProfile, SchemeBrief};
use crate::state::AppState;

/// Default radius for location search, in metres
const DEFAULT_RADIUS_M: f64 = 10_000.0;

/// Default page size when only `page` is given
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Larger `limit` values are clamped to this
const MAX_PAGE_SIZE: i64 = 100;

/// Schemes attached to each patta in the per-state listing
const STATE_RECOMMENDATIONS: usize = 3;

/// Create the pattas router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pattas).post(create_patta))
        .route("/location", get(search_by_location))
        .route("/state/:state", get(list_by_state))
        .route("/state/:state/recommendations", get(list_by_state_with_recommendations))
        .route("/:id", get(get_patta).put(update_patta).delete(delete_patta))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    state: Option<String>,
    district: Option<String>,
    status: Option<String>,
    search: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

fn positive(name: &str, value: Option<String>) -> Result<Option<i64>> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => match v.trim().parse::<i64>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(AppError::BadRequest(format!("{} must be a positive integer", name))),
        },
    }
}

/// List pattas with optional filters and pagination
async fn list_pattas(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Patta>>>> {
    let status = match non_empty(params.status) {
        None => None,
        Some(s) => Some(
            PattaStatus::parse(&s).ok_or_else(|| AppError::BadRequest(format!("Invalid status: {}", s)))?,
        ),
    };
    let page = positive("page", params.page)?;
    let limit = positive("limit", params.limit)?;

    let mut query = PattaQuery {
        state: non_empty(params.state),
        district: non_empty(params.district),
        status,
        search: non_empty(params.search).map(|s| s.trim().to_string()),
        ..Default::default()
    };

    let repo = PattaRepository::new(state.db());

    if page.is_none() && limit.is_none() {
        let pattas = repo.list(&query).await?;
        return Ok(ApiResponse::list(pattas));
    }

    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    query.limit = Some(limit);
    query.offset = Some((page - 1).saturating_mul(limit));

    let total = repo.count(&query).await?;
    let pattas = repo.list(&query).await?;
    Ok(ApiResponse::page(pattas, total, page, limit))
}

/// Summaries of every patta in a state
async fn list_by_state(
    State(state): State<AppState>,
    Path(state_name): Path<String>,
) -> Result<Json<ApiResponse<Vec<PattaSummary>>>> {
    let repo = PattaRepository::new(state.db());
    let pattas = repo.list_by_state(&state_name).await?;
    Ok(ApiResponse::list(pattas.iter().map(PattaSummary::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsQuery {
    include_recommendations: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaWithSchemes {
    #[serde(flatten)]
    patta: Patta,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommended_schemes: Option<Vec<SchemeBrief>>,
}

/// Pattas in a state, each with its top individual schemes
async fn list_by_state_with_recommendations(
    State(state): State<AppState>,
    Path(state_name): Path<String>,
    Query(params): Query<RecommendationsQuery>,
) -> Result<Json<ApiResponse<Vec<PattaWithSchemes>>>> {
    // Anything but the literal "true" turns recommendations off
    let include = params.include_recommendations.as_deref().unwrap_or("true") == "true";

    let repo = PattaRepository::new(state.db());
    let pattas = repo.list_by_state(&state_name).await?;
    let info = AdditionalInfo::default();

    let data = pattas
        .into_iter()
        .map(|patta| {
            let recommended_schemes = include.then(|| {
                let profile = IndividualProfile::from_patta(&patta.fields, &info);
                individual::recommend(&profile, STATE_RECOMMENDATIONS)
                    .iter()
                    .map(|scored| scored.scheme.brief())
                    .collect()
            });
            PattaWithSchemes {
                patta,
                recommended_schemes,
            }
        })
        .collect();

    Ok(ApiResponse::list(data))
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    longitude: Option<String>,
    latitude: Option<String>,
    radius: Option<String>,
}

fn coordinate(value: Option<String>) -> Option<f64> {
    non_empty(value)?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pattas within a radius of a point, nearest first
async fn search_by_location(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Vec<Patta>>>> {
    let (Some(lon), Some(lat)) = (coordinate(params.longitude), coordinate(params.latitude)) else {
        return Err(AppError::BadRequest("Longitude and latitude are required".to_string()));
    };
    let radius = match non_empty(params.radius) {
        None => DEFAULT_RADIUS_M,
        Some(r) => r
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite() && *r >= 0.0)
            .ok_or_else(|| AppError::BadRequest("Radius must be a non-negative number".to_string()))?,
    };

    let repo = PattaRepository::new(state.db());
    let nearby = repo.near(GeoPoint::new(lon, lat), radius).await?;
    tracing::debug!("{} pattas within {}m of ({}, {})", nearby.len(), radius, lon, lat);

    Ok(ApiResponse::list(nearby.into_iter().map(|n| n.patta).collect()))
}

/// Create a new patta
async fn create_patta(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Patta>>)> {
    let fields = PattaDraft::from_json(body)?.validate()?;

    let repo = PattaRepository::new(state.db());
    let patta = repo.create(&fields, SYSTEM_USER_ID).await?;
    tracing::info!("Patta {} created", patta.fields.patta_number);

    Ok((StatusCode::CREATED, ApiResponse::ok(patta)))
}

/// Get a specific patta
async fn get_patta(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ApiResponse<Patta>>> {
    let repo = PattaRepository::new(state.db());
    let patta = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Patta not found".to_string()))?;
    Ok(ApiResponse::ok(patta))
}

/// Merge changes into a patta and re-validate the whole record
async fn update_patta(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<Patta>>> {
    let repo = PattaRepository::new(state.db());
    let existing = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Patta not found".to_string()))?;

    let mut merged = serde_json::to_value(&existing.fields)?;
    merge_json(&mut merged, body);
    let fields = PattaDraft::from_json(merged)?.validate()?;

    let patta = repo
        .update(&id, &fields, SYSTEM_USER_ID)
        .await?
        .ok_or_else(|| AppError::NotFound("Patta not found".to_string()))?;
    tracing::info!("Patta {} updated", patta.fields.patta_number);

    Ok(ApiResponse::ok(patta))
}

/// Delete a patta
async fn delete_patta(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let repo = PattaRepository::new(state.db());
    if !repo.delete(&id).await? {
        return Err(AppError::NotFound("Patta not found".to_string()));
    }
    tracing::info!("Patta {} deleted", id);

    Ok(Json(json!({ "success": true, "message": "Patta deleted successfully" })))
}
