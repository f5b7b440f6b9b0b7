//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::assist::PattaAssistant;
use crate::config::Config;
use crate::ocr::OcrService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    ocr: OcrService,
    assistant: PattaAssistant,
}

impl AppState {
    /// Create a new application state with the hosted OCR and LLM providers
    pub fn new(config: Config, db: SqlitePool) -> Self {
        // One connection pool for every outbound call
        let client = reqwest::Client::new();
        let ocr = OcrService::new(&config.ocr, client.clone());
        let assistant = PattaAssistant::new(&config.llm, client);

        Self::with_services(config, db, ocr, assistant)
    }

    /// Create a state around explicitly constructed services
    pub fn with_services(config: Config, db: SqlitePool, ocr: OcrService, assistant: PattaAssistant) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                ocr,
                assistant,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    /// Get the form assistant
    pub fn assistant(&self) -> &PattaAssistant {
        &self.inner.assistant
    }
}
