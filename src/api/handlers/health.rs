/*
 * Responsibility
 * - GET / (liveness probe, 認証なし)
 */
pub async fn health() -> &'static str {
    "ok"
}
