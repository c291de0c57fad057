/*
 * Responsibility
 * - 外部 collaborator と横断ロジック
 *   - claims: bearer token の local decode
 *   - validator: 外部 token validator
 *   - notify: 招待メール / Lambda
 *   - scoping: scope pattern と response filter
 *   - diagnostics: error tracking record
 */
pub mod claims;
pub mod diagnostics;
pub mod notify;
pub mod scoping;
pub mod validator;
