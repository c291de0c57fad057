/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト (AuthContext) を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthContext
 * - AuthContextExtractor
 */

mod core;
mod types;

pub use core::AuthContextExtractor;
pub use types::AuthContext;
