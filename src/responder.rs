//! Multi-Provider AI Responder
//!
//! Fires one chat query at every configured provider concurrently and
//! resolves with the first successful answer. Individual provider failures
//! are logged and never abort the race; only total exhaustion surfaces, as a
//! single blackout error with one audit entry.

use crate::catalog::DocumentRegistry;
use crate::error::PortalError;
use crate::provider::{ChatRequest, ChatTurn, ProviderClient};
use crate::telemetry::AuditTrail;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Turns of prior conversation sent with each query.
const HISTORY_WINDOW: usize = 5;

/// Fixed low-variance sampling for grounded answers.
const TEMPERATURE: f32 = 0.3;

const MAX_TOKENS: u32 = 1024;

/// Audit action recorded when every provider fails.
pub const BLACKOUT_ACTION: &str = "assistant_blackout";

/// A successful assistant answer and its provenance. Which provider answers
/// is non-deterministic across runs; callers may rely only on it being one of
/// the configured backends.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub provider: String,
}

pub struct Responder {
    providers: Vec<Arc<dyn ProviderClient>>,
    registry: DocumentRegistry,
    audit: AuditTrail,
    persona: String,
}

impl Responder {
    pub fn new(
        providers: Vec<Arc<dyn ProviderClient>>,
        registry: DocumentRegistry,
        audit: AuditTrail,
        persona: String,
    ) -> Self {
        Self {
            providers,
            registry,
            audit,
            persona,
        }
    }

    /// Answer one user query.
    ///
    /// All providers receive the same request, issued in configuration order;
    /// completions are unordered and the first success wins. Losing calls are
    /// left to run to completion and their results are discarded.
    pub async fn process_message(
        &self,
        query: &str,
        history: &[ChatTurn],
    ) -> Result<Reply, PortalError> {
        if self.providers.is_empty() {
            return Err(PortalError::ProviderNotConfigured(
                "no assistant providers configured".to_string(),
            ));
        }

        let request = self.build_request(query, history);

        let mut in_flight = FuturesUnordered::new();
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let request = request.clone();
            in_flight.push(async move {
                let started = Instant::now();
                let outcome = provider.complete(&request).await;
                (provider, started.elapsed(), outcome)
            });
        }

        let mut failed = 0usize;
        while let Some((provider, elapsed, outcome)) = in_flight.next().await {
            match outcome {
                Ok(text) => {
                    info!(
                        provider = provider.provider_name(),
                        model = provider.model_name(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "assistant answered"
                    );
                    return Ok(Reply {
                        text,
                        provider: provider.provider_name().to_string(),
                    });
                }
                Err(err) => {
                    failed += 1;
                    warn!(
                        provider = provider.provider_name(),
                        error = %err,
                        "provider failed; race continues"
                    );
                }
            }
        }

        self.audit.record(
            BLACKOUT_ACTION,
            format!("all {failed} providers failed"),
        );
        Err(PortalError::ProviderBlackout { attempted: failed })
    }

    /// One shared request: system prompt plus the recent conversation window
    /// and the new query.
    fn build_request(&self, query: &str, history: &[ChatTurn]) -> ChatRequest {
        let window_start = history.len().saturating_sub(HISTORY_WINDOW);
        let mut turns: Vec<ChatTurn> = history[window_start..].to_vec();
        turns.push(ChatTurn::user(query));

        ChatRequest {
            system: self.system_prompt(),
            turns,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    fn system_prompt(&self) -> String {
        let now = Utc::now().format("%Y-%m-%d %H:%M UTC");
        let titles = self.registry.titles();
        let listing = if titles.is_empty() {
            "none yet".to_string()
        } else {
            titles.join(", ")
        };
        format!(
            "{persona}\nCurrent date and time: {now}.\nAvailable documents: {listing}.",
            persona = self.persona
        )
    }
}
