/*!
 * Remote token validation
 *
 * Responsibility:
 * - 外部 token validator への問い合わせを trait で抽象化する
 * - route + method 単位の permission check と token 単体の validity check
 *
 * Public API:
 * - TokenValidator / ValidatorError
 * - RemoteValidator (reqwest 実装)
 */

mod remote;

use async_trait::async_trait;
use axum::http::{HeaderMap, Method};
use thiserror::Error;

pub use remote::RemoteValidator;

#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The validator answered and said no.
    #[error("Unauthorized")]
    Rejected { status: u16 },
    /// The validator could not be asked.
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Checks the caller's token against the permission registry for `route` + `method`.
    async fn validate_route(
        &self,
        headers: &HeaderMap,
        route: &str,
        method: &Method,
    ) -> Result<(), ValidatorError>;

    /// Checks only that the caller's token is valid.
    async fn validate_token(&self, headers: &HeaderMap) -> Result<(), ValidatorError>;
}
