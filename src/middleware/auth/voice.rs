//! Voice-provider token placement.
//!
//! Alexa sends the account-linking token inside the directive instead of the
//! `Authorization` header: on `directive.endpoint.scope.token` for endpoint
//! directives, on `directive.payload.scope.token` for discovery.

use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderValue, Request, header};
use serde_json::Value;

use crate::error::AppError;

/// Upper bound on a buffered voice payload.
const MAX_VOICE_BODY: usize = 1024 * 1024;

pub(super) fn alexa_token(body: &[u8]) -> Option<String> {
    let directive: Value = serde_json::from_slice(body).ok()?;

    ["/directive/endpoint/scope/token", "/directive/payload/scope/token"]
        .iter()
        .filter_map(|pointer| directive.pointer(pointer).and_then(Value::as_str))
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

/// Buffers the body, copies the Alexa token into `Authorization`, and restores the body.
pub(super) async fn promote_alexa_token(req: Request<Body>) -> Result<Request<Body>, AppError> {
    let (mut parts, body) = req.into_parts();
    let bytes: Bytes = to_bytes(body, MAX_VOICE_BODY)
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    if let Some(token) = alexa_token(&bytes) {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AppError::unauthorized())?;
        parts.headers.insert(header::AUTHORIZATION, value);
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}
