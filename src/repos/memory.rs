//! In-process `RecordStore` for tests.
//!
//! Rows keep insertion order, which stands in for `created_at` ordering.
//! Every call is counted so tests can assert that storage was never touched.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::repos::entities::Table;
use crate::repos::error::RepoError;
use crate::repos::store::{Filter, Order, Page, RecordStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Vec<Value>>>,
    calls: AtomicUsize,
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

impl MemoryStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Raw rows, soft-deleted ones included.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(
        &self,
        table: &Table,
        filter: &Filter,
        page: Option<Page>,
    ) -> Result<Vec<Value>, RepoError> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(table.name)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        !table.soft_delete || row.get("deleted_at").is_none_or(Value::is_null)
                    })
                    .filter(|row| filter.accepts(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if filter.order() == Order::Newest {
            rows.reverse();
        }

        Ok(match page {
            Some(page) => rows
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
            None => rows,
        })
    }

    async fn insert(&self, table: &Table, record: Value) -> Result<Value, RepoError> {
        self.touch();
        self.tables
            .lock()
            .unwrap()
            .entry(table.name)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        table: &Table,
        id: Uuid,
        record: Value,
    ) -> Result<Option<Value>, RepoError> {
        self.touch();
        let id = id.to_string();
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .get_mut(table.name)
            .and_then(|rows| rows.iter_mut().find(|row| record_id(row) == Some(id.as_str())))
        else {
            return Ok(None);
        };
        *row = record.clone();
        Ok(Some(record))
    }

    async fn delete(&self, table: &Table, id: Uuid) -> Result<bool, RepoError> {
        self.touch();
        let id = id.to_string();
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(table.name) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|row| record_id(row) != Some(id.as_str()));
        Ok(rows.len() != before)
    }
}
