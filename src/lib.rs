//! Van-Niti Server Library
//!
//! Backend for recording forest-rights titles (pattas) and village resource
//! surveys, recommending welfare schemes for both, and turning scanned
//! titles into form drafts.
//!
//! # Modules
//!
//! - `db`: SQLite persistence for pattas and resources
//! - `models`: record types and request validation
//! - `schemes`: village and individual scheme rule tables
//! - `ocr`: upload relay to the recognizer and the rule-based form mapper
//! - `assist`: LLM reconciliation of mapped forms
//! - `routes`: HTTP handlers

pub mod assist;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod models;
pub mod ocr;
pub mod routes;
pub mod schemes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/health", routes::health::router())
        .nest("/api/pattas", routes::pattas::router())
        .nest("/api/resources", routes::resources::router())
        .nest("/api/ocr", routes::ocr::router())
        .nest("/api/ai", routes::ai::router())
        .nest("/api/individual-schemes", routes::individual_schemes::router())
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
