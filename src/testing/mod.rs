use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::AppConfig;
use crate::services::{Mailer, NotifyError, OutboundEmail, PdfRenderer};
use crate::state::AppState;

/// Mailer that keeps every message in memory.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// The raw token from the most recent reset email.
    pub fn last_reset_token(&self) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find_map(|m| m.body.lines().find_map(|l| l.strip_prefix("Reset token: ")).map(str::to_string))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: OutboundEmail) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        if self.fail {
            return Err(NotifyError::Delivery("recording mailer set to fail".to_string()));
        }
        Ok(())
    }
}

/// Application state over a throwaway data directory.
pub struct TestContext {
    pub state: AppState,
    pub mailer: RecordingMailer,
    // Held so the directory outlives the state.
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_failing_mailer() -> Self {
        Self::with_mailer(RecordingMailer::failing())
    }

    fn with_mailer(mailer: RecordingMailer) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = AppConfig::rooted_at(dir.path());
        let state = AppState::with_collaborators(config, Arc::new(mailer.clone()), Arc::new(PdfRenderer))
            .expect("build test state");

        Self {
            state,
            mailer,
            _dir: dir,
        }
    }
}
