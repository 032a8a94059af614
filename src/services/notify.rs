//! Outbound mail. Delivery is an external concern; the platform only needs
//! to hand a message to something that implements [`Mailer`].

use std::sync::Arc;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: OutboundEmail) -> Result<(), NotifyError>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: OutboundEmail) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, subject = %message.subject, "outbound email (log only)");
        tracing::debug!(body = %message.body, "outbound email body");
        Ok(())
    }
}

/// Send and forget: failures are logged, never returned, never retried.
pub async fn deliver(mailer: &Arc<dyn Mailer>, message: OutboundEmail) {
    let to = message.to.clone();
    if let Err(e) = mailer.send(message).await {
        tracing::warn!(to = %to, error = %e, "failed to send email");
    }
}
