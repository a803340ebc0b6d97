//! AI Provider Abstraction
//!
//! Unified interface for the chat-completion backends the assistant races.
//! Each provider adapts one wire format (OpenAI-compatible endpoints, or
//! Gemini's generateContent) to the shared request shape and returns plain
//! text or a typed failure.

use crate::error::PortalError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Chat turn role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

/// The request shape every provider must accept: a system instruction, an
/// ordered conversation window, and fixed sampling parameters.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub turns: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Provider client trait
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Produce a single text completion for the request.
    async fn complete(&self, request: &ChatRequest) -> Result<String, PortalError>;

    /// Identifying tag used in logs and replies.
    fn provider_name(&self) -> &str;

    /// Model the provider is configured to query.
    fn model_name(&self) -> &str;
}

/// Provider wire protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// OpenAI itself or any endpoint speaking its chat-completions format.
    OpenaiCompatible,
    /// Google Gemini's generateContent format.
    Gemini,
}

/// Declarative provider configuration, one entry per backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub name: String,
    pub kind: ProviderKind,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ProviderSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("provider name cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        Ok(())
    }
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, PortalError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| PortalError::ProviderRequestFailed(format!("Failed to create HTTP client: {e}")))
}

fn map_http_error(error: reqwest::Error) -> PortalError {
    if error.is_timeout() {
        PortalError::ProviderRequestFailed(format!("Request timeout: {error}"))
    } else if error.is_connect() {
        PortalError::ProviderRequestFailed(format!("Connection error: {error}"))
    } else {
        PortalError::ProviderRequestFailed(format!("HTTP error: {error}"))
    }
}

fn map_status_error(status: u16, body: String) -> PortalError {
    match status {
        401 | 403 => PortalError::ProviderAuthFailed(body),
        429 => PortalError::ProviderRateLimit(body),
        _ => PortalError::ProviderRequestFailed(format!("status {status}: {body}")),
    }
}

async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}

fn role_to_string(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Assistant => "assistant",
    }
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

/// Client for OpenAI or any OpenAI-compatible gateway.
pub struct OpenAiCompatibleClient {
    client: Client,
    name: String,
    model: String,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiCompatibleClient {
    pub fn new(
        name: String,
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, PortalError> {
        let client = build_provider_http_client()?;
        let base_url = base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        Ok(Self {
            client,
            name,
            model,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, PortalError> {
        let mut messages = vec![WireMessage {
            role: "system".to_string(),
            content: request.system.clone(),
        }];
        messages.extend(request.turns.iter().map(|turn| WireMessage {
            role: role_to_string(turn.role).to_string(),
            content: turn.text.clone(),
        }));

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = builder.json(&body).send().await.map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(map_status_error(status, error_body(response).await));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| PortalError::ProviderResponseMalformed(e.to_string()))?;

        let choice = completion.choices.first().ok_or_else(|| {
            PortalError::ProviderResponseMalformed("No choices in response".to_string())
        })?;

        Ok(choice.message.content.clone())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Client for Google Gemini's generateContent endpoint.
pub struct GeminiClient {
    client: Client,
    name: String,
    model: String,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        name: String,
        model: String,
        api_key: String,
        base_url: Option<String>,
    ) -> Result<Self, PortalError> {
        let client = build_provider_http_client()?;
        let base_url = base_url
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());
        Ok(Self {
            client,
            name,
            model,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, PortalError> {
        // Gemini names the assistant role "model" and takes the system
        // instruction out of band.
        let contents: Vec<serde_json::Value> = request
            .turns
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Assistant => "model",
                };
                json!({ "role": role, "parts": [{ "text": turn.text }] })
            })
            .collect();

        let body = json!({
            "system_instruction": { "parts": [{ "text": request.system }] },
            "contents": contents,
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            },
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(map_status_error(status, error_body(response).await));
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: CandidateContent,
        }
        #[derive(Deserialize)]
        struct CandidateContent {
            parts: Vec<CandidatePart>,
        }
        #[derive(Deserialize)]
        struct CandidatePart {
            text: String,
        }

        let completion: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PortalError::ProviderResponseMalformed(e.to_string()))?;

        let text = completion
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| {
                PortalError::ProviderResponseMalformed("No candidates in response".to_string())
            })?;

        Ok(text)
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Provider factory for creating clients from settings
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_client(
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn ProviderClient>, PortalError> {
        settings
            .validate()
            .map_err(|e| PortalError::ProviderNotConfigured(format!("{}: {e}", settings.name)))?;

        match settings.kind {
            ProviderKind::OpenaiCompatible => Ok(Arc::new(OpenAiCompatibleClient::new(
                settings.name.clone(),
                settings.model.clone(),
                settings.api_key.clone(),
                settings.endpoint.clone(),
            )?)),
            ProviderKind::Gemini => {
                let api_key = settings.api_key.clone().ok_or_else(|| {
                    PortalError::ProviderNotConfigured(format!(
                        "{}: gemini requires an api key",
                        settings.name
                    ))
                })?;
                Ok(Arc::new(GeminiClient::new(
                    settings.name.clone(),
                    settings.model.clone(),
                    api_key,
                    settings.endpoint.clone(),
                )?))
            }
        }
    }

    /// Build clients for every configured provider, preserving order.
    pub fn create_all(
        settings: &[ProviderSettings],
    ) -> Result<Vec<Arc<dyn ProviderClient>>, PortalError> {
        settings.iter().map(Self::create_client).collect()
    }
}
