use std::env;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

/// How the generation pipeline reacts when the structured parse of model
/// output fails: `Strict` fails immediately, `Lenient` retries once with a
/// raw-text call and manual JSON extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    Strict,
    Lenient,
}

impl GenerationMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Some(GenerationMode::Strict),
            "lenient" => Some(GenerationMode::Lenient),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub quizzes_collection: String,
    pub llm_api_key: SecretString,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_output_tokens: u32,
    pub llm_request_timeout_secs: u64,
    pub generation_mode: GenerationMode,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let llm_api_key = env::var("LLM_API_KEY")
            .map_err(|_| AppError::InternalError("LLM_API_KEY is not set".to_string()))?;

        Ok(Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "wikiquiz-local".to_string()),
            quizzes_collection: env::var("QUIZZES_COLLECTION")
                .unwrap_or_else(|_| "quizzes".to_string()),
            llm_api_key: SecretString::from(llm_api_key),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            llm_temperature: env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0.2),
            llm_max_output_tokens: env::var("LLM_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(4096),
            llm_request_timeout_secs: env::var("LLM_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(120),
            generation_mode: env::var("GENERATION_MODE")
                .ok()
                .and_then(|m| GenerationMode::parse(&m))
                .unwrap_or(GenerationMode::Lenient),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        })
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "wikiquiz-test".to_string(),
            quizzes_collection: "quizzes".to_string(),
            llm_api_key: SecretString::from("test-api-key".to_string()),
            llm_api_base: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            llm_temperature: 0.2,
            llm_max_output_tokens: 4096,
            llm_request_timeout_secs: 5,
            generation_mode: GenerationMode::Lenient,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
        }
    }
}
