/*
 * Responsibility
 * - handler 共通の extractor (認証コンテキスト / pagination / body / path)
 */
mod auth_ctx;
mod pagination;
mod request;

pub use auth_ctx::{AuthContext, AuthContextExtractor};
pub use pagination::{Paginated, Pagination};
pub use request::{JsonBody, Params};
