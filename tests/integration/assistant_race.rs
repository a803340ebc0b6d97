//! Assistant race semantics against mocked providers: first success wins,
//! individual failures stay invisible, total blackout is a single clear
//! failure with one audit entry.

use async_trait::async_trait;
use lectern::catalog::DocumentRegistry;
use lectern::error::PortalError;
use lectern::provider::{ChatRequest, ChatTurn, ProviderClient};
use lectern::responder::{Responder, BLACKOUT_ACTION};
use lectern::store::PortalStore;
use lectern::telemetry::AuditTrail;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct MockProvider {
    name: &'static str,
    reply: Option<&'static str>,
    delay: Duration,
}

impl MockProvider {
    fn succeeding(name: &'static str, reply: &'static str, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: Some(reply),
            delay: Duration::from_millis(delay_ms),
        })
    }

    fn failing(name: &'static str, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: None,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, PortalError> {
        tokio::time::sleep(self.delay).await;
        match self.reply {
            Some(text) => Ok(text.to_string()),
            None => Err(PortalError::ProviderRequestFailed(format!(
                "{} is down",
                self.name
            ))),
        }
    }

    fn provider_name(&self) -> &str {
        self.name
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn responder_with(providers: Vec<Arc<dyn ProviderClient>>) -> (TempDir, Responder, AuditTrail) {
    let dir = TempDir::new().unwrap();
    let store = PortalStore::open(dir.path()).unwrap();
    let audit = AuditTrail::new(store.clone());
    let registry = DocumentRegistry::new(store, audit.clone());
    let responder = Responder::new(
        providers,
        registry,
        audit.clone(),
        "You are the portal assistant.".to_string(),
    );
    (dir, responder, audit)
}

#[tokio::test]
async fn the_single_healthy_provider_wins_the_race() {
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        MockProvider::failing("alpha", 2),
        MockProvider::failing("beta", 8),
        MockProvider::succeeding("gamma", "from gamma", 15),
        MockProvider::failing("delta", 1),
    ];
    let (_dir, responder, _audit) = responder_with(providers);

    let reply = responder
        .process_message("where are the algebra notes?", &[])
        .await
        .unwrap();

    assert_eq!(reply.text, "from gamma");
    assert_eq!(reply.provider, "gamma");
}

#[tokio::test]
async fn winner_is_one_of_the_configured_providers() {
    // Two healthy providers with close timings: the winner is whichever
    // settles first, and callers may only rely on it being configured.
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        MockProvider::succeeding("alpha", "from alpha", 5),
        MockProvider::succeeding("beta", "from beta", 5),
    ];
    let (_dir, responder, _audit) = responder_with(providers);

    let reply = responder.process_message("hello", &[]).await.unwrap();
    assert!(["alpha", "beta"].contains(&reply.provider.as_str()));
}

#[tokio::test]
async fn blackout_surfaces_once_with_one_audit_entry() {
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        MockProvider::failing("alpha", 1),
        MockProvider::failing("beta", 2),
        MockProvider::failing("gamma", 3),
        MockProvider::failing("delta", 4),
    ];
    let (_dir, responder, audit) = responder_with(providers);

    let err = responder.process_message("anyone there?", &[]).await.unwrap_err();

    assert!(matches!(err, PortalError::ProviderBlackout { attempted: 4 }));
    assert_eq!(audit.entries_for(BLACKOUT_ACTION).len(), 1);
}

#[tokio::test]
async fn conversation_history_rides_along() {
    let providers: Vec<Arc<dyn ProviderClient>> =
        vec![MockProvider::succeeding("solo", "noted", 1)];
    let (_dir, responder, _audit) = responder_with(providers);

    let history = vec![
        ChatTurn::user("do you have calculus material?"),
        ChatTurn::assistant("Yes, under Math > Calculus."),
    ];

    let reply = responder
        .process_message("and statistics?", &history)
        .await
        .unwrap();
    assert_eq!(reply.text, "noted");
}
