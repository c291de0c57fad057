/*
 * Responsibility
 * - 永続化層の公開インターフェース
 * - RecordStore (境界) / PgStore (実装) / Repo<E> (型付き CRUD)
 */
pub mod entities;
pub mod error;
pub mod postgres;
pub mod queries;
pub mod repo;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use repo::Repo;
pub use store::{Filter, Page, RecordStore};
