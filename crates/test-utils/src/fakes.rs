use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pollwatch::config::ActionSpec;
use pollwatch::errors::ActionError;
use pollwatch::exec::{ActionRunner, HttpTransport, RunnerFuture, TransportFuture};
use pollwatch::types::EventKind;
use pollwatch::watch::ChangeEvent;

/// One call observed by a [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCall {
    pub action: String,
    pub path: PathBuf,
    pub kind: EventKind,
}

/// A fake runner that:
/// - records every call
/// - fails the first `failures` calls with `NonZeroExit`, then succeeds
/// - optionally sleeps before answering (to exercise timeouts/cancellation)
#[derive(Clone)]
pub struct ScriptedRunner {
    failures: u32,
    delay: Option<Duration>,
    attempts: Arc<AtomicU32>,
    calls: Arc<Mutex<Vec<RunnerCall>>>,
}

impl ScriptedRunner {
    pub fn succeeding() -> Self {
        Self::failing_times(0)
    }

    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures,
            delay: None,
            attempts: Arc::new(AtomicU32::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ActionRunner for ScriptedRunner {
    fn run<'a>(&'a self, event: &'a ChangeEvent, action: &'a ActionSpec) -> RunnerFuture<'a> {
        Box::pin(async move {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(RunnerCall {
                action: action.name.clone(),
                path: event.path.clone(),
                kind: event.kind,
            });

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if n < self.failures {
                Err(ActionError::NonZeroExit(format!("scripted failure {}", n + 1)))
            } else {
                Ok(())
            }
        })
    }
}

/// A captured webhook request.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub url: String,
    pub body: serde_json::Value,
}

/// HTTP transport that records requests and answers with a fixed status.
#[derive(Clone)]
pub struct FakeTransport {
    status: u16,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeTransport {
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a serde_json::Value,
        _timeout: Duration,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(CapturedRequest {
                url: url.to_string(),
                body: body.clone(),
            });
            Ok(self.status)
        })
    }
}
