/*
 * Responsibility
 * - 4 つの静的 route table (trusted / explicit / implicit / voice) の定義
 * - Route = method + path pattern + 認証モード + handler
 * - table は起動時に一度だけ組み立て、以後変更しない (dispatch 側で Router 化)
 */
use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{self, MethodRouter};

use crate::middleware::auth::AuthMode;
use crate::state::AppState;

mod explicit;
mod implicit;
mod trusted;
mod voice;

pub struct Route {
    pub method: Method,
    /// Path template; also the `Route` header sent to the validator.
    pub pattern: &'static str,
    pub auth: AuthMode,
    pub endpoint: MethodRouter<AppState>,
}

impl Route {
    pub fn get<H, T>(pattern: &'static str, auth: AuthMode, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::GET, pattern, auth, routing::get(handler))
    }

    pub fn post<H, T>(pattern: &'static str, auth: AuthMode, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::POST, pattern, auth, routing::post(handler))
    }

    pub fn put<H, T>(pattern: &'static str, auth: AuthMode, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::PUT, pattern, auth, routing::put(handler))
    }

    pub fn delete<H, T>(pattern: &'static str, auth: AuthMode, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::DELETE, pattern, auth, routing::delete(handler))
    }

    fn new(
        method: Method,
        pattern: &'static str,
        auth: AuthMode,
        endpoint: MethodRouter<AppState>,
    ) -> Self {
        Self {
            method,
            pattern,
            auth,
            endpoint,
        }
    }
}

/// Every registered route, in table order.
pub fn table() -> Vec<Route> {
    let mut routes = trusted::routes();
    routes.extend(explicit::routes());
    routes.extend(implicit::routes());
    routes.extend(voice::routes());
    routes
}
