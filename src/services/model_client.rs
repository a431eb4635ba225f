use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// One chat-completion exchange. `json_mode` asks the backend for a strict
/// JSON object; the raw-text fallback path clears it.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub json_mode: bool,
}

/// The provider may answer with a bare string, or with a completion
/// envelope whose message content is either a string or a list of content
/// parts. All three shapes deserialize into this union.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelReply {
    Text(String),
    Candidates(CompletionEnvelope),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionEnvelope {
    #[serde(default)]
    pub choices: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub message: CandidateMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateMessage {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CandidateContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Resolves any reply variant to plain text: a direct text field wins,
/// otherwise the first candidate's content parts are concatenated. A reply
/// with no textual content at all is `ModelResponseEmpty`.
pub fn resolve_reply_text(reply: &ModelReply) -> AppResult<String> {
    let text = match reply {
        ModelReply::Text(text) => text.clone(),
        ModelReply::Candidates(envelope) => {
            let candidate = envelope.choices.first().ok_or(AppError::ModelResponseEmpty)?;
            match &candidate.message.content {
                Some(CandidateContent::Text(text)) => text.clone(),
                Some(CandidateContent::Parts(parts)) => parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join(""),
                None => String::new(),
            }
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::ModelResponseEmpty);
    }

    Ok(text)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<ModelReply>;
}

/// Chat-completions backend over an OpenAI-compatible endpoint. One call
/// per request, fixed model id, low temperature, generous output ceiling;
/// transport failures surface as `ModelCallFailed` and are never retried.
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_request_timeout_secs))
            .build()
            .map_err(|e| AppError::InternalError(format!("failed to build HTTP client: {e}")))?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(config.llm_api_key.expose_secret())
            .with_api_base(config.llm_api_base.as_str());

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(http_client),
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            max_output_tokens: config.llm_max_output_tokens,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<ModelReply> {
        let mut payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_output_tokens,
        });
        if request.json_mode {
            payload["response_format"] = serde_json::json!({"type": "json_object"});
        }

        let reply: ModelReply = self.client.chat().create_byot(payload).await?;
        Ok(reply)
    }
}
