/*!
 * Outbound notifications
 *
 * Responsibility:
 * - 招待メール送信 (Mailer) と serverless function 起動 (FunctionInvoker) の境界
 * - AWS 実装 (SES v2 / Lambda) と、メール設定が無い環境向けの LogMailer
 *
 * Public API:
 * - Mailer / InvitationEmail / SesMailer / LogMailer
 * - FunctionInvoker / LambdaInvoker
 * - NotifyError
 */

mod lambda;
mod ses;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use lambda::LambdaInvoker;
pub use ses::SesMailer;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email delivery failed: {0}")]
    Email(String),
    #[error("function invocation failed: {0}")]
    Invoke(String),
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationEmail {
    pub recipient: String,
    pub account_name: String,
    pub code: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), NotifyError>;
}

#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Fire-and-forget invocation of `function` with a JSON payload.
    async fn invoke(&self, function: &str, payload: &Value) -> Result<(), NotifyError>;
}

/// Used when no invitation template is configured.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %email.recipient,
            account = %email.account_name,
            code = %email.code,
            "invitation mail not configured; skipping delivery"
        );
        Ok(())
    }
}
