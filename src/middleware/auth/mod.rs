/*!
 * Per-route authentication
 *
 * Responsibility:
 * - route ごとの認証モード (trusted / explicit / implicit / voice) の定義
 * - 認証 middleware 本体 (access) と voice provider 固有の token 取り出し (voice)
 *
 * Public API:
 * - AuthMode / VoiceProvider / RouteGuard
 * - authenticate (from_fn_with_state 用)
 * - bearer
 */

mod access;
mod voice;

use axum::http::{HeaderMap, header};

use crate::state::AppState;

pub use access::authenticate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceProvider {
    Google,
    Alexa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Backend integrations: route + method permission check, no claims.
    Trusted,
    /// Developer/admin routes: route + method permission check, bearer carried forward.
    Explicit,
    /// Self-service routes: token validity check plus a local scope match on claims.
    Implicit { scope: &'static str },
    /// Voice-assistant webhooks: token validity check, token may live in the body.
    Voice(VoiceProvider),
}

impl AuthMode {
    pub const fn implicit(scope: &'static str) -> Self {
        Self::Implicit { scope }
    }
}

/// State of the authentication layer attached to one registered route.
#[derive(Clone)]
pub struct RouteGuard {
    pub state: AppState,
    pub pattern: &'static str,
    pub mode: AuthMode,
}

/// Token of an `Authorization: Bearer <token>` header.
pub fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
