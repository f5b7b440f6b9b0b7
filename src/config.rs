//! Configuration management for Van-Niti Server

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Insert sample pattas and village resources into an empty database
    pub seed: bool,
}

/// NVIDIA NeMo Retriever OCR endpoint
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// OpenAI-compatible chat completion endpoint used to reconcile OCR drafts
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

pub const DEFAULT_OCR_ENDPOINT: &str = "https://ai.api.nvidia.com/v1/cv/nvidia/nemoretriever-ocr-v1";
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite:./vanniti.db".to_string(),
                seed: false,
            },
            ocr: OcrConfig {
                endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
                api_key: None,
            },
            llm: LlmConfig {
                endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
                api_key: None,
                model: DEFAULT_LLM_MODEL.to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("SERVER_PORT").or_else(|_| env::var("PORT")) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value,
            })?,
            Err(_) => 5000,
        };

        let seed = match env::var("SEED_SAMPLE_DATA") {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: "SEED_SAMPLE_DATA",
                value,
            })?,
            Err(_) => false,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./vanniti.db".to_string()),
                seed,
            },
            ocr: OcrConfig {
                endpoint: env::var("OCR_ENDPOINT").unwrap_or_else(|_| DEFAULT_OCR_ENDPOINT.to_string()),
                api_key: env::var("NVIDIA_API_KEY").ok(),
            },
            llm: LlmConfig {
                endpoint: env::var("LLM_ENDPOINT").unwrap_or_else(|_| DEFAULT_LLM_ENDPOINT.to_string()),
                api_key: env::var("GROQ_API_KEY").ok(),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert!(!config.database.seed);
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert!(config.ocr.api_key.is_none());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
