//! Catch-all for handler panics.
//!
//! A panic inside the dispatched route becomes a 500 `{"error": ...}` response
//! and a diagnostics record tagged with the caller's bearer token. The
//! connection and the process keep serving.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use futures::FutureExt;

use crate::error::AppError;
use crate::middleware::auth::bearer;
use crate::services::diagnostics;

pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(recover))
}

async fn recover(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let token = bearer(req.headers()).map(str::to_string);

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            diagnostics::report_panic(
                method.as_str(),
                &path,
                token.as_deref(),
                &panic_message(panic.as_ref()),
            );
            AppError::internal("internal server error").into_response()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
