//! Test doubles and request helpers shared by router-level tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api;
use crate::middleware::recover;
use crate::repos::memory::MemoryStore;
use crate::services::notify::{FunctionInvoker, InvitationEmail, Mailer, NotifyError};
use crate::services::validator::{TokenValidator, ValidatorError};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
    Unreachable,
}

impl Verdict {
    fn outcome(self) -> Result<(), ValidatorError> {
        match self {
            Verdict::Allow => Ok(()),
            Verdict::Deny => Err(ValidatorError::Rejected { status: 401 }),
            Verdict::Unreachable => Err(ValidatorError::Transport(
                ScriptedValidator::TRANSPORT_ERROR.to_string(),
            )),
        }
    }
}

/// One call observed by the scripted validator.
#[derive(Debug, Clone)]
pub struct Seen {
    pub route: Option<String>,
    pub method: Option<String>,
    pub authorization: Option<String>,
}

/// Answers permission checks and token checks with fixed verdicts.
pub struct ScriptedValidator {
    route: Verdict,
    token: Verdict,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedValidator {
    pub const TRANSPORT_ERROR: &'static str = "error sending request for url (http://validator.test/validate-token)";

    pub fn new(route: Verdict, token: Verdict) -> Self {
        Self {
            route,
            token,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn allow_all() -> Self {
        Self::new(Verdict::Allow, Verdict::Allow)
    }

    pub fn deny_all() -> Self {
        Self::new(Verdict::Deny, Verdict::Deny)
    }

    pub fn unreachable() -> Self {
        Self::new(Verdict::Unreachable, Verdict::Unreachable)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, headers: &HeaderMap, route: Option<&str>, method: Option<&Method>) {
        self.seen.lock().unwrap().push(Seen {
            route: route.map(str::to_string),
            method: method.map(|m| m.to_string()),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }
}

#[async_trait]
impl TokenValidator for ScriptedValidator {
    async fn validate_route(
        &self,
        headers: &HeaderMap,
        route: &str,
        method: &Method,
    ) -> Result<(), ValidatorError> {
        self.record(headers, Some(route), Some(method));
        self.route.outcome()
    }

    async fn validate_token(&self, headers: &HeaderMap) -> Result<(), ValidatorError> {
        self.record(headers, None, None);
        self.token.outcome()
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<InvitationEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<InvitationEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Forwards every invocation to a channel so tests can await background calls.
pub struct RecordingInvoker {
    tx: mpsc::UnboundedSender<(String, Value)>,
}

#[async_trait]
impl FunctionInvoker for RecordingInvoker {
    async fn invoke(&self, function: &str, payload: &Value) -> Result<(), NotifyError> {
        let _ = self.tx.send((function.to_string(), payload.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub validator: Arc<ScriptedValidator>,
    pub mailer: Arc<RecordingMailer>,
    invocations: tokio::sync::Mutex<mpsc::UnboundedReceiver<(String, Value)>>,
    router: Router,
}

impl TestApp {
    pub const DISPENSE_FUNCTION: &'static str = "DispenserDispense";

    /// The full route table behind the panic recovery layer.
    pub fn new(validator: ScriptedValidator) -> Self {
        Self::with_router(validator, |state| {
            recover::apply(api::router(state).expect("route table is unambiguous"))
        })
    }

    pub fn with_router(
        validator: ScriptedValidator,
        build: impl FnOnce(AppState) -> Router,
    ) -> Self {
        let store = Arc::new(MemoryStore::default());
        let validator = Arc::new(validator);
        let mailer = Arc::new(RecordingMailer::default());
        let (tx, rx) = mpsc::unbounded_channel();

        let state = AppState::new(
            store.clone(),
            validator.clone(),
            mailer.clone(),
            Arc::new(RecordingInvoker { tx }),
            Self::DISPENSE_FUNCTION,
        );
        let router = build(state.clone());

        Self {
            state,
            store,
            validator,
            mailer,
            invocations: tokio::sync::Mutex::new(rx),
            router,
        }
    }

    /// Status and body; non-JSON bodies come back as a JSON string.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    /// Next function invocation, waiting up to a second for background tasks.
    pub async fn next_invocation(&self) -> Option<(String, Value)> {
        let mut rx = self.invocations.lock().await;
        tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .ok()
            .flatten()
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn mint(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(b"validator-secret"),
    )
    .unwrap()
}

pub fn scoped_token(
    user_id: Uuid,
    account_id: Uuid,
    owner: bool,
    scopes: &[&str],
    fields: &[&str],
) -> String {
    mint(&json!({
        "scope_permissions": scopes,
        "scoped_fields": fields,
        "user_id": user_id,
        "account_id": account_id,
        "owner": owner,
    }))
}

/// Collects formatted `tracing` output for the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
