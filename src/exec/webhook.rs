// src/exec/webhook.rs

//! `webhook` actions: POST the event as JSON.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::{ActionKind, ActionSpec};
use crate::errors::ActionError;
use crate::exec::runner::{ActionRunner, RunnerFuture};
use crate::exec::template::{expand, format_mtime};
use crate::watch::ChangeEvent;

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<u16, ActionError>> + Send + 'a>>;

/// Minimal HTTP client used by webhook actions.
///
/// Implementations send `body` as `application/json` and return the
/// response status; transport failures map to [`ActionError::Http`].
pub trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a serde_json::Value,
        timeout: Duration,
    ) -> TransportFuture<'a>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a serde_json::Value,
        timeout: Duration,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .timeout(timeout)
                .json(body)
                .send()
                .await
                .map_err(|e| ActionError::Http(e.to_string()))?;
            Ok(response.status().as_u16())
        })
    }
}

/// JSON body sent to webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub path: String,
    pub relpath: String,
    /// Empty unless the event is a move.
    pub prev_path: String,
    pub event: String,
    pub size: u64,
    pub mtime: String,
    pub age_ms: u64,
    pub is_dir: bool,
}

impl WebhookPayload {
    pub fn from_event(event: &ChangeEvent) -> Self {
        Self {
            path: event.path.to_string_lossy().into_owned(),
            relpath: event.rel_path.clone(),
            prev_path: event
                .prev_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            event: event.kind.to_string(),
            size: event.record.size,
            mtime: format_mtime(event.record.modified),
            age_ms: u64::try_from(event.age.as_millis()).unwrap_or(u64::MAX),
            is_dir: event.record.is_dir,
        }
    }
}

pub struct WebhookRunner {
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for WebhookRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookRunner").finish_non_exhaustive()
    }
}

impl WebhookRunner {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl ActionRunner for WebhookRunner {
    fn run<'a>(&'a self, event: &'a ChangeEvent, action: &'a ActionSpec) -> RunnerFuture<'a> {
        Box::pin(async move {
            let ActionKind::Webhook(spec) = &action.kind else {
                return Err(ActionError::UnsupportedAction(action.action_type()));
            };

            let url = expand(&spec.url, event);
            if url.trim().is_empty() {
                debug!(action = %action.name, "webhook url expanded to nothing; skipping");
                return Ok(());
            }

            let body = serde_json::to_value(WebhookPayload::from_event(event))
                .map_err(|e| ActionError::Http(format!("encoding payload: {e}")))?;

            let status = self.transport.post_json(&url, &body, action.effective_timeout()).await?;
            debug!(action = %action.name, %url, status, "webhook delivered");

            if status >= 300 {
                return Err(ActionError::HttpStatus(status));
            }
            Ok(())
        })
    }
}
