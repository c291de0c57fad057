/*
 * Responsibility
 * - implicit: account の connection 一覧 / 参照 / 更新 / 切断
 * - 切断は disconnected_at を記録してから soft delete
 */
use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::api::extractors::{AuthContextExtractor, JsonBody, Paginated, Pagination, Params};
use crate::api::handlers::{owned, patch_owned, success};
use crate::error::AppError;
use crate::repos::{Filter, Repo};
use crate::repos::entities::Connection;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let connections = state
        .repo::<Connection>()
        .find(
            Filter::new().eq("account_id", ctx.require_account()?),
            Some(pagination.page()),
        )
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&connections)?)))
}

pub async fn show(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(connection_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let connection = owned(
        &state.repo::<Connection>(),
        connection_id,
        "account_id",
        ctx.require_account()?,
    )
    .await?;

    Ok(Json(ctx.visible(&connection)?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(connection_id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let connection = patch_owned(
        &state.repo::<Connection>(),
        connection_id,
        "account_id",
        ctx.require_account()?,
        body,
    )
    .await?;

    Ok(Json(ctx.visible(&connection)?))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(connection_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let connections = state.repo::<Connection>();
    owned(&connections, connection_id, "account_id", ctx.require_account()?).await?;

    disconnect(&connections, connection_id).await?;
    Ok(success())
}

/// Stamps `disconnected_at`, then soft-deletes.
pub(crate) async fn disconnect(
    connections: &Repo<Connection>,
    connection_id: Uuid,
) -> Result<(), AppError> {
    let mut changes = Map::new();
    changes.insert("disconnected_at".into(), json!(Utc::now()));
    connections.patch(connection_id, changes).await?;
    connections.delete(connection_id).await?;

    Ok(())
}
