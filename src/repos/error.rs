/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - "not found" は他のストレージエラーと区別して返す
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Caller-supplied changes do not fit the record shape.
    #[error("invalid record: {0}")]
    Invalid(serde_json::Error),
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("record decode error")]
    Decode(#[from] serde_json::Error),
}
