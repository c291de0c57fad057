/*
 * Responsibility
 * - route が無い / method が合わないときの終端 handler
 * - plain text のみ。認証も副作用もなし
 */
use axum::http::StatusCode;

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
