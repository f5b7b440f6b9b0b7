//! Route modules for the Van-Niti server

pub mod ai;
pub mod health;
pub mod individual_schemes;
pub mod ocr;
pub mod pattas;
pub mod resources;

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// Success envelope: `{"success": true, "data": ...}` plus list metadata
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            count: None,
            total: None,
            page: None,
            pages: None,
            data,
        })
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: Some(data.len()),
            total: None,
            page: None,
            pages: None,
            data,
        })
    }

    pub fn page(data: Vec<T>, total: i64, page: i64, limit: i64) -> Json<Self> {
        Json(Self {
            success: true,
            count: Some(data.len()),
            total: Some(total),
            page: Some(page),
            pages: Some(total / limit + i64::from(total % limit != 0)),
            data,
        })
    }
}

/// Response for unmatched routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}

/// Query-string values arrive as text; blank means absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
