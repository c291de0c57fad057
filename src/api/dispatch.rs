/*
 * Responsibility
 * - route table → axum Router
 *   - 同じ path shape (param 名は無視) の route を 1 つの MethodRouter に merge
 *   - 同一 method + shape の重複は起動時に RouteTableError
 *   - route ごとに認証 (route_layer) を掛ける
 * - 404 / 405 fallback と liveness (GET /)
 */
use std::collections::BTreeMap;

use axum::http::Method;
use axum::routing::{MethodRouter, get};
use axum::{Router, middleware};
use thiserror::Error;

use crate::api::handlers::{fallback, health};
use crate::api::routes::Route;
use crate::middleware::auth::{RouteGuard, authenticate};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("{method} {pattern} overlaps {method} {existing}")]
    Ambiguous {
        method: Method,
        pattern: &'static str,
        existing: &'static str,
    },
}

pub fn build(state: AppState, routes: Vec<Route>) -> Result<Router, RouteTableError> {
    let mut slots: BTreeMap<String, Vec<Route>> = BTreeMap::new();

    for route in routes {
        let slot = slots.entry(shape(route.pattern)).or_default();
        if let Some(existing) = slot.iter().find(|r| r.method == route.method) {
            return Err(RouteTableError::Ambiguous {
                method: route.method,
                pattern: route.pattern,
                existing: existing.pattern,
            });
        }
        slot.push(route);
    }

    let mut router = Router::new().route("/", get(health::health));

    for slot in slots.into_values() {
        let mut routes = slot.into_iter();
        let Some(first) = routes.next() else {
            continue;
        };
        let path = first.pattern;
        let endpoint = routes.fold(guarded(&state, first), |endpoint, route| {
            endpoint.merge(guarded(&state, route))
        });

        router = router.route(path, endpoint);
    }

    tracing::debug!("route table built");

    Ok(router
        .fallback(fallback::not_found)
        // 405 fallback は登録済み route にだけ掛かるので最後に置く
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .with_state(state))
}

fn guarded(state: &AppState, route: Route) -> MethodRouter<AppState> {
    let guard = RouteGuard {
        state: state.clone(),
        pattern: route.pattern,
        mode: route.auth,
    };

    route
        .endpoint
        .route_layer(middleware::from_fn_with_state(guard, authenticate))
}

/// `/user/{user_id}` and `/user/{external_id}` share the shape `/user/{}`.
fn shape(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
