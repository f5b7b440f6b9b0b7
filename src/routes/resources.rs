//! Village resource API routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{non_empty, ApiResponse};
use crate::db::{ResourceRepository, ResourceStats};
use crate::error::{AppError, Result};
use crate::models::{check_resource_update, merge_json, Resource, ResourceDraft};
use crate::schemes::village::{self, VillageScheme};
use crate::schemes::Scored;
use crate::state::AppState;

/// Create the resources router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_resources).post(create_resource))
        .route("/stats", get(resource_stats))
        .route("/:id", get(get_resource).patch(update_resource).delete(delete_resource))
}

#[derive(Debug, Deserialize)]
pub struct ResourceFilter {
    state: Option<String>,
    district: Option<String>,
}

/// Resource with the village schemes it qualifies for
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceWithSchemes {
    #[serde(flatten)]
    resource: Resource,
    recommended_schemes: Vec<Scored<'static, VillageScheme>>,
}

impl From<Resource> for ResourceWithSchemes {
    fn from(resource: Resource) -> Self {
        let recommended_schemes = village::recommend_default(&resource.fields);
        Self {
            resource,
            recommended_schemes,
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

/// Create a resource
async fn create_resource(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Resource>>)> {
    let fields = ResourceDraft::from_json(body)?.validate()?;

    let repo = ResourceRepository::new(state.db());
    let resource = repo.create(&fields).await?;
    tracing::info!("Resource {}/{}/{} created", fields.state, fields.district, fields.village);

    Ok((StatusCode::CREATED, ApiResponse::ok(resource)))
}

/// List resources with their recommended schemes
async fn list_resources(
    State(state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
) -> Result<Json<ApiResponse<Vec<ResourceWithSchemes>>>> {
    let state_name = non_empty(filter.state);
    let district = non_empty(filter.district);

    let repo = ResourceRepository::new(state.db());
    let resources = repo.list(state_name.as_deref(), district.as_deref()).await?;

    Ok(ApiResponse::list(resources.into_iter().map(ResourceWithSchemes::from).collect()))
}

/// Aggregates grouped by state, district or village
async fn resource_stats(
    State(state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
) -> Result<Json<ApiResponse<Vec<ResourceStats>>>> {
    let state_name = non_empty(filter.state);
    let district = non_empty(filter.district);

    let repo = ResourceRepository::new(state.db());
    let stats = repo.stats(state_name.as_deref(), district.as_deref()).await?;

    Ok(ApiResponse::ok(stats))
}

/// Get a resource with its recommended schemes
async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ResourceWithSchemes>>> {
    let repo = ResourceRepository::new(state.db());
    let resource = repo.get(&id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(resource.into()))
}

/// Update the whitelisted figures of a resource
async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<Resource>>> {
    check_resource_update(&body)?;

    let repo = ResourceRepository::new(state.db());
    let existing = repo.get(&id).await?.ok_or_else(not_found)?;

    let mut merged = serde_json::to_value(&existing.fields)?;
    merge_json(&mut merged, body);
    let fields = ResourceDraft::from_json(merged)?.validate()?;

    let resource = repo.update(&id, &fields).await?.ok_or_else(not_found)?;
    tracing::info!("Resource {} updated", id);

    Ok(ApiResponse::ok(resource))
}

/// Delete a resource
async fn delete_resource(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let repo = ResourceRepository::new(state.db());
    if !repo.delete(&id).await? {
        return Err(not_found());
    }
    tracing::info!("Resource {} deleted", id);

    Ok(Json(json!({ "success": true, "data": {} })))
}
