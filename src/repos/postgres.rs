/*
 * Responsibility
 * - RecordStore の Postgres 実装 (sqlx)
 * - 読み取りは to_jsonb(t)、書き込みは jsonb_populate_record で行い、
 *   テーブルごとの Row 型を持たずに済ませる
 * - table / column 名は Entity の定数のみ (ユーザー入力は必ず bind)
 */
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::repos::entities::Table;
use crate::repos::error::RepoError;
use crate::repos::store::{Condition, Filter, Order, Page, RecordStore};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT` for `filter`, comparing real columns so the usual indexes apply.
fn select_query(
    table: &Table,
    filter: &Filter,
    page: Option<Page>,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT to_jsonb(t) AS record FROM {} t WHERE TRUE",
        table.name
    ));

    if table.soft_delete {
        query.push(" AND t.deleted_at IS NULL");
    }

    // column names come from Entity constants, values are always bound
    for (column, condition) in filter.conditions() {
        query.push(format!(" AND t.\"{column}\" = "));
        match condition {
            Condition::Id(id) => query.push_bind(*id),
            Condition::Text(text) => query.push_bind(text.clone()),
        };
    }

    match filter.order() {
        Order::Oldest => query.push(" ORDER BY t.created_at ASC, t.id ASC"),
        Order::Newest => query.push(" ORDER BY t.created_at DESC, t.id DESC"),
    };

    if let Some(page) = page {
        query.push(" LIMIT ");
        query.push_bind(i64::from(page.limit));
        query.push(" OFFSET ");
        query.push_bind(i64::from(page.offset));
    }

    query
}

#[async_trait]
impl RecordStore for PgStore {
    async fn select(
        &self,
        table: &Table,
        filter: &Filter,
        page: Option<Page>,
    ) -> Result<Vec<Value>, RepoError> {
        let mut query = select_query(table, filter, page);
        let rows: Vec<(Json<Value>,)> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(|(Json(record),)| record).collect())
    }

    async fn insert(&self, table: &Table, record: Value) -> Result<Value, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO {table} AS t ({columns})
            SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)
            RETURNING to_jsonb(t) AS record
            "#,
            table = table.name,
            columns = column_list(table),
        );

        let (Json(record),): (Json<Value>,) = sqlx::query_as(&sql)
            .bind(Json(record))
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn update(
        &self,
        table: &Table,
        id: Uuid,
        record: Value,
    ) -> Result<Option<Value>, RepoError> {
        let sql = format!(
            r#"
            UPDATE {table} AS t
            SET ({columns}) = (
                SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)
            )
            WHERE t.id = $2
            RETURNING to_jsonb(t) AS record
            "#,
            table = table.name,
            columns = column_list(table),
        );

        let row: Option<(Json<Value>,)> = sqlx::query_as(&sql)
            .bind(Json(record))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(Json(record),)| record))
    }

    async fn delete(&self, table: &Table, id: Uuid) -> Result<bool, RepoError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.name);

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
