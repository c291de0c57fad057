//! Bearer token check → AuthContext を extensions に入れる
//!
//! - trusted / explicit: validator に route pattern + method を渡して permission を確認
//! - implicit: validator で token の有効性だけ確認し、claims を local decode して scope を照合
//! - voice: implicit と同じ decode。Alexa は body 内の token を Authorization に昇格してから確認
//!
//! 失敗はここで response に変換され、handler には到達しない。

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;

use crate::api::extractors::AuthContext;
use crate::error::AppError;
use crate::services::claims::{ClaimsError, ScopedClaims, VoiceClaims};
use crate::services::diagnostics;
use crate::services::scoping::any_matches;
use crate::services::validator::ValidatorError;
use crate::state::AppState;

use super::voice::promote_alexa_token;
use super::{AuthMode, RouteGuard, VoiceProvider, bearer};

/// `route_layer(from_fn_with_state(guard, authenticate))` で route ごとに掛ける。
pub async fn authenticate(
    State(guard): State<RouteGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let RouteGuard {
        state,
        pattern,
        mode,
    } = guard;

    let ctx = match mode {
        AuthMode::Trusted => {
            state
                .validator
                .validate_route(req.headers(), pattern, req.method())
                .await
                .map_err(|err| validator_failure(err, pattern, req.headers()))?;

            AuthContext::trusted(bearer(req.headers()).map(str::to_string))
        }
        AuthMode::Explicit => {
            state
                .validator
                .validate_route(req.headers(), pattern, req.method())
                .await
                .map_err(|err| validator_failure(err, pattern, req.headers()))?;

            let token = required_bearer(req.headers(), pattern)?;
            AuthContext::trusted(Some(token))
        }
        AuthMode::Implicit { scope } => {
            state
                .validator
                .validate_token(req.headers())
                .await
                .map_err(|err| validator_failure(err, pattern, req.headers()))?;

            let token = required_bearer(req.headers(), pattern)?;
            let claims: ScopedClaims = decode_claims(&state, &token, pattern)?;

            if !any_matches(&claims.scope_permissions, scope) {
                tracing::warn!(route = pattern, scope, "required scope not granted");
                return Err(AppError::unauthorized());
            }

            AuthContext::scoped(claims, token)
        }
        AuthMode::Voice(provider) => {
            if provider == VoiceProvider::Alexa {
                req = promote_alexa_token(req).await?;
            }

            state
                .validator
                .validate_token(req.headers())
                .await
                .map_err(|err| validator_failure(err, pattern, req.headers()))?;

            let token = required_bearer(req.headers(), pattern)?;
            let claims: VoiceClaims = decode_claims(&state, &token, pattern)?;

            AuthContext::voice(claims, token)
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

fn validator_failure(err: ValidatorError, pattern: &str, headers: &HeaderMap) -> AppError {
    match err {
        ValidatorError::Rejected { status } => {
            tracing::warn!(route = pattern, status, "token rejected by validator");
            AppError::unauthorized()
        }
        ValidatorError::Transport(message) => {
            diagnostics::report_upstream(pattern, bearer(headers), &message);
            AppError::Upstream(message)
        }
    }
}

fn required_bearer(headers: &HeaderMap, pattern: &str) -> Result<String, AppError> {
    match bearer(headers) {
        Some(token) => Ok(token.to_string()),
        None => {
            tracing::warn!(route = pattern, "missing bearer token");
            Err(AppError::unauthorized())
        }
    }
}

fn decode_claims<T>(state: &AppState, token: &str, pattern: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Clone,
{
    state.claims.decode::<T>(token).map_err(|err| match &err {
        ClaimsError::Claims(_) => {
            tracing::warn!(route = pattern, error = %err, "token claims rejected");
            AppError::unauthorized()
        }
        ClaimsError::Malformed(_) => {
            tracing::warn!(route = pattern, error = %err, "token could not be parsed");
            AppError::internal(err.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        CapturedLogs, ScriptedValidator, TestApp, Verdict, mint, request, scoped_token,
    };
    use axum::{Extension, Json, Router, http::Method, http::StatusCode, middleware, routing::post};
    use serde_json::{Value, json};
    use uuid::Uuid;

    async fn echo(Extension(ctx): Extension<AuthContext>) -> Json<Value> {
        Json(json!({
            "user_id": ctx.user_id,
            "account_id": ctx.account_id,
            "owner": ctx.owner,
            "token": ctx.raw_token,
        }))
    }

    fn probe(mode: AuthMode) -> impl FnOnce(AppState) -> Router {
        move |state| {
            let guard = RouteGuard {
                state: state.clone(),
                pattern: "/probe",
                mode,
            };
            Router::new()
                .route(
                    "/probe",
                    post(echo).route_layer(middleware::from_fn_with_state(guard, authenticate)),
                )
                .with_state(state)
        }
    }

    #[tokio::test]
    async fn trusted_route_rejection_never_reaches_storage() {
        let app = TestApp::with_router(
            ScriptedValidator::new(Verdict::Deny, Verdict::Allow),
            probe(AuthMode::Trusted),
        );

        let (status, body) = app
            .send(request(Method::POST, "/probe", Some("anything"), None))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
        assert_eq!(app.store.calls(), 0);
    }

    #[tokio::test]
    async fn trusted_route_forwards_route_and_method() {
        let app = TestApp::with_router(ScriptedValidator::allow_all(), probe(AuthMode::Trusted));

        let (status, body) = app
            .send(request(Method::POST, "/probe", Some("lambda-token"), None))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], "lambda-token");
        assert_eq!(body["user_id"], Value::Null);

        let seen = app.validator.seen();
        assert_eq!(seen[0].route.as_deref(), Some("/probe"));
        assert_eq!(seen[0].method.as_deref(), Some("POST"));
    }

    #[tokio::test]
    async fn unreachable_validator_is_a_500_with_the_transport_message() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let app = TestApp::with_router(
            ScriptedValidator::unreachable(),
            probe(AuthMode::implicit("account.info")),
        );

        let (status, body) = app
            .send(request(Method::POST, "/probe", Some("token"), None))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": ScriptedValidator::TRANSPORT_ERROR }));

        let logs = logs.contents();
        let record = logs
            .lines()
            .find(|line| line.contains("token validator unavailable"))
            .unwrap();
        assert!(record.contains("diagnostics"));
        assert!(record.contains("/probe"));
        assert!(record.contains(ScriptedValidator::TRANSPORT_ERROR));
    }

    #[tokio::test]
    async fn explicit_route_without_bearer_is_unauthorized() {
        let app = TestApp::with_router(ScriptedValidator::allow_all(), probe(AuthMode::Explicit));

        let (status, _) = app.send(request(Method::POST, "/probe", None, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wildcard_grant_covers_its_subtree_only() {
        let token = scoped_token(Uuid::new_v4(), Uuid::new_v4(), true, &["account.*"], &["*"]);

        let allowed = TestApp::with_router(
            ScriptedValidator::allow_all(),
            probe(AuthMode::implicit("account.update")),
        );
        let (status, body) = allowed
            .send(request(Method::POST, "/probe", Some(&token), None))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["owner"], true);

        let denied = TestApp::with_router(
            ScriptedValidator::allow_all(),
            probe(AuthMode::implicit("user.update")),
        );
        let (status, _) = denied
            .send(request(Method::POST, "/probe", Some(&token), None))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_grants_never_authorize() {
        let token = scoped_token(Uuid::new_v4(), Uuid::new_v4(), false, &[], &["*"]);
        let app = TestApp::with_router(
            ScriptedValidator::allow_all(),
            probe(AuthMode::implicit("account.info")),
        );

        let (status, _) = app
            .send(request(Method::POST, "/probe", Some(&token), None))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn mistyped_claims_are_unauthorized_and_garbage_is_500() {
        let app = TestApp::with_router(
            ScriptedValidator::allow_all(),
            probe(AuthMode::implicit("account.info")),
        );

        let mistyped = mint(&json!({
            "scope_permissions": ["*"],
            "scoped_fields": ["*"],
            "user_id": "not-a-uuid",
            "account_id": Uuid::new_v4(),
            "owner": true,
        }));
        let (status, _) = app
            .send(request(Method::POST, "/probe", Some(&mistyped), None))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send(request(Method::POST, "/probe", Some("garbage"), None))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn alexa_token_is_taken_from_the_directive() {
        let user_id = Uuid::new_v4();
        let token = mint(&json!({ "user_id": user_id }));
        let app = TestApp::with_router(
            ScriptedValidator::allow_all(),
            probe(AuthMode::Voice(VoiceProvider::Alexa)),
        );

        let body = json!({
            "directive": {
                "header": { "name": "TurnOn" },
                "endpoint": { "scope": { "type": "BearerToken", "token": token } }
            }
        });
        let (status, echoed) = app
            .send(request(Method::POST, "/probe", None, Some(body)))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(echoed["user_id"], json!(user_id));
        assert_eq!(
            app.validator.seen()[0].authorization,
            Some(format!("Bearer {token}"))
        );
    }
}
