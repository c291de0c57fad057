/*
 * Responsibility
 * - 永続化 collaborator の境界 (RecordStore trait)
 * - JSON record 単位で select / insert / update / delete を提供
 * - 型付けは Repo<E> 側の責務。ここは table 記述子と JSON だけを扱う
 */
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::repos::entities::Table;
use crate::repos::error::RepoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Oldest,
    Newest,
}

/// Right-hand side of an equality condition, at the column's native type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Id(Uuid),
    Text(String),
}

impl Condition {
    fn matches(&self, field: Option<&Value>) -> bool {
        let Some(raw) = field.and_then(Value::as_str) else {
            return false;
        };
        match self {
            Condition::Id(id) => Uuid::parse_str(raw).is_ok_and(|stored| stored == *id),
            Condition::Text(text) => raw == text,
        }
    }
}

impl From<Uuid> for Condition {
    fn from(id: Uuid) -> Self {
        Condition::Id(id)
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Condition::Text(text.to_owned())
    }
}

impl From<&String> for Condition {
    fn from(text: &String) -> Self {
        Condition::Text(text.clone())
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        Condition::Text(text)
    }
}

/// Equality conditions on top-level record fields, ANDed together.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(&'static str, Condition)>,
    order: Order,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::new().eq("id", id)
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Condition>) -> Self {
        self.conditions.push((column, value.into()));
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = Order::Newest;
        self
    }

    pub fn conditions(&self) -> &[(&'static str, Condition)] {
        &self.conditions
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// In-process evaluation of the same predicate the SQL store builds.
    pub fn accepts(&self, record: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(column, condition)| condition.matches(record.get(*column)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    pub fn first() -> Self {
        Self::new(1, 0)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Live rows only when `table.soft_delete`; ordered by `created_at`, then `id`.
    async fn select(
        &self,
        table: &Table,
        filter: &Filter,
        page: Option<Page>,
    ) -> Result<Vec<Value>, RepoError>;

    async fn insert(&self, table: &Table, record: Value) -> Result<Value, RepoError>;

    /// Full replace. `Ok(None)` when no row has `id`.
    async fn update(&self, table: &Table, id: Uuid, record: Value)
    -> Result<Option<Value>, RepoError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, table: &Table, id: Uuid) -> Result<bool, RepoError>;
}
