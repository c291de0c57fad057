/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route 単位の認証 (route_layer)
 * - recover / security_headers / cors / http: router 全体に掛ける層
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod recover;
pub mod security_headers;
