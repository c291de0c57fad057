/*
 * Responsibility
 * - HTTP 層の公開インターフェース
 * - route table (routes) を dispatch に渡して Router を組み立てる
 */
pub mod dispatch;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod routes;

use axum::Router;

use crate::state::AppState;

pub use dispatch::RouteTableError;

/// The full route table, authenticated per route, with 404 / 405 fallbacks.
pub fn router(state: AppState) -> Result<Router, RouteTableError> {
    dispatch::build(state, routes::table())
}
