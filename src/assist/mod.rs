//! LLM-assisted patta form extraction
//!
//! The rule-based mapper produces a first draft from OCR detections; the
//! assistant asks a chat model to correct and complete it against the raw
//! detections. When the model is unavailable the draft stands.

mod provider;

use std::sync::Arc;

use serde_json::Value;

use crate::config::LlmConfig;
use crate::ocr::{map_ocr_to_form, KNOWN_DISTRICTS};

pub use provider::{CompletionProvider, GroqProvider};

const SYSTEM_PROMPT: &str = "You are a precise JSON data extraction model.";

const ALLOWED_STATES: &[&str] = &["Tripura", "Telangana", "Madhya Pradesh", "Odisha"];

const FORM_INTERFACE: &str = r#"interface PattaFormData {
  pattaNumber: string;
  holder: {
    name: string;
    fatherName: string;
    tribe: string;
    category: "Scheduled Tribe" | "Other Traditional Forest Dweller";
  };
  location: {
    state: string;
    district: string;
    subDivision: string;
    revenueCircle: string;
    village: string;
    surveyNumber: string;
    khatiyanNumber: string;
    coordinates: {
      type: string;
      coordinates: [number, number];
    };
    area: {
      value: number;
      unit: "acres" | "hectares";
    };
    boundaries: {
      north: string;
      south: string;
      east: string;
      west: string;
    };
  };
  rights: string[];
  isHeritable: boolean;
  status: "active" | "inactive" | "pending";
  issuedBy: {
    authority: string;
    designation: string;
    date: string;
  };
}"#;

/// Assistant errors
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("GROQ_API_KEY is not set")]
    NotConfigured,

    #[error("Completion API error: {0}")]
    Api(String),

    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Model returned {0} instead of a JSON object")]
    NotAnObject(&'static str),
}

/// Build the user prompt for one OCR result and its draft.
pub fn build_prompt(ocr_result: &Value, draft: &Value) -> Result<String, AssistError> {
    let districts = serde_json::to_string(KNOWN_DISTRICTS)?;
    let ocr = serde_json::to_string_pretty(ocr_result)?;
    let draft = serde_json::to_string_pretty(draft)?;

    Ok(format!(
        r#"You are an intelligent data extraction assistant.

You will be given:
1. Raw OCR results (sometimes noisy, misspelled, or inconsistent).
2. A partially filled JSON form (PattaFormData).

Your job:
- Correct OCR mistakes (e.g., "Khativan" -> "Khatiyan", "Basty" -> "Bastu").
- Fill missing details if possible.
- Normalize names (district, sub-division, revenue circle) to known values: {districts}.
- The state is one of: {states}.
- Ensure date is in YYYY-MM-DD format.
- Output strictly valid JSON matching this TypeScript interface:

{interface}

Return **only the JSON object**, no explanations.

OCR Result:
{ocr}

Draft Form Data:
{draft}
"#,
        districts = districts,
        states = ALLOWED_STATES.join(", "),
        interface = FORM_INTERFACE,
        ocr = ocr,
        draft = draft,
    ))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reconciles OCR output with form drafts through a completion provider
pub struct PattaAssistant {
    provider: Arc<dyn CompletionProvider>,
}

impl PattaAssistant {
    pub fn new(config: &LlmConfig, client: reqwest::Client) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("GROQ_API_KEY not set, AI form reconciliation disabled");
        }

        Self {
            provider: Arc::new(GroqProvider::new(
                client,
                &config.endpoint,
                config.api_key.clone(),
                &config.model,
            )),
        }
    }

    pub fn with_provider(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Ask the model to correct `draft` against the raw `ocr_result`.
    pub async fn reconcile(&self, ocr_result: &Value, draft: &Value) -> Result<Value, AssistError> {
        let prompt = build_prompt(ocr_result, draft)?;
        tracing::debug!("Reconciling OCR draft with {}", self.provider.name());

        let content = self.provider.complete(SYSTEM_PROMPT, &prompt).await?;
        let parsed: Value = serde_json::from_str(&content)?;

        if parsed.is_object() {
            Ok(parsed)
        } else {
            Err(AssistError::NotAnObject(kind_of(&parsed)))
        }
    }

    /// Rule-based draft, refined by the model when it can be.
    pub async fn resolve_form(&self, ocr_result: &Value) -> Result<Value, AssistError> {
        let draft = serde_json::to_value(map_ocr_to_form(ocr_result))?;

        match self.reconcile(ocr_result, &draft).await {
            Ok(form) => Ok(form),
            Err(e) => {
                tracing::warn!("AI reconciliation failed, using rule-based draft: {}", e);
                Ok(draft)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Canned(Result<&'static str, &'static str>);

    #[async_trait]
    impl CompletionProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, system: &str, user: &str) -> Result<String, AssistError> {
            assert_eq!(system, SYSTEM_PROMPT);
            assert!(user.contains("Draft Form Data:"));
            self.0
                .map(str::to_string)
                .map_err(|e| AssistError::Api(e.to_string()))
        }
    }

    fn ocr() -> Value {
        json!({
            "data": [{
                "text_detections": [
                    { "text_prediction": { "text": "Patta No: TR-9" } },
                    { "text_prediction": { "text": "District: Dhalal" } }
                ]
            }]
        })
    }

    #[test]
    fn test_prompt_mentions_context() {
        let prompt = build_prompt(&ocr(), &json!({ "pattaNumber": "TR-9" })).unwrap();
        assert!(prompt.contains("\"West Tripura\""));
        assert!(prompt.contains("Tripura, Telangana, Madhya Pradesh, Odisha"));
        assert!(prompt.contains("khatiyanNumber: string;"));
        assert!(prompt.contains("\"pattaNumber\": \"TR-9\""));
    }

    #[tokio::test]
    async fn test_reconcile_parses_object() {
        let assistant = PattaAssistant::with_provider(Arc::new(Canned(Ok(r#"{"pattaNumber":"TR-9"}"#))));
        let form = assistant.reconcile(&ocr(), &json!({})).await.unwrap();
        assert_eq!(form, json!({ "pattaNumber": "TR-9" }));
    }

    #[tokio::test]
    async fn test_reconcile_rejects_bad_output() {
        let assistant = PattaAssistant::with_provider(Arc::new(Canned(Ok("not json"))));
        assert!(matches!(
            assistant.reconcile(&ocr(), &json!({})).await,
            Err(AssistError::InvalidJson(_))
        ));

        let assistant = PattaAssistant::with_provider(Arc::new(Canned(Ok("[1]"))));
        assert!(matches!(
            assistant.reconcile(&ocr(), &json!({})).await,
            Err(AssistError::NotAnObject("an array"))
        ));
    }

    #[tokio::test]
    async fn test_resolve_form_falls_back_to_draft() {
        let assistant = PattaAssistant::with_provider(Arc::new(Canned(Err("rate limited"))));
        let form = assistant.resolve_form(&ocr()).await.unwrap();
        assert_eq!(form["pattaNumber"], "TR-9");
        assert_eq!(form["location"]["district"], "Dhalai");
    }

    #[tokio::test]
    async fn test_resolve_form_prefers_model() {
        let assistant = PattaAssistant::with_provider(Arc::new(Canned(Ok(r#"{"pattaNumber":"TR/9"}"#))));
        let form = assistant.resolve_form(&ocr()).await.unwrap();
        assert_eq!(form["pattaNumber"], "TR/9");
    }
}
