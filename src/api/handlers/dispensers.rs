/*
 * Responsibility
 * - implicit: account に接続中の dispenser の一覧 / 参照 / 更新 / 削除
 * - 「account の dispenser」= live connection が参照している dispenser
 */
use axum::{Json, extract::State};
use serde_json::Value;
use uuid::Uuid;

use crate::api::extractors::{AuthContextExtractor, JsonBody, Paginated, Pagination, Params};
use crate::api::handlers::{changes, same_id, success};
use crate::error::AppError;
use crate::repos::entities::Dispenser;
use crate::repos::{Page, queries};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let dispensers = queries::account_dispensers(
        &state.store,
        ctx.require_account()?,
        Some(pagination.page()),
    )
    .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&dispensers)?)))
}

pub async fn show(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(dispenser_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let dispenser =
        queries::account_dispenser(&state.store, ctx.require_account()?, dispenser_id).await?;

    Ok(Json(ctx.visible(&dispenser)?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(dispenser_id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let changes = changes(body)?;
    same_id(&changes, dispenser_id, "dispenser")?;
    queries::account_dispenser(&state.store, ctx.require_account()?, dispenser_id).await?;

    let dispenser = state.repo::<Dispenser>().patch(dispenser_id, changes).await?;
    Ok(Json(ctx.visible(&dispenser)?))
}

/// Removes the account's first connected dispenser.
pub async fn remove_first(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
) -> Result<Json<Value>, AppError> {
    let dispenser = queries::account_dispensers(
        &state.store,
        ctx.require_account()?,
        Some(Page::first()),
    )
    .await?
    .into_iter()
    .next()
    .ok_or_else(|| AppError::not_found("dispenser"))?;

    state.repo::<Dispenser>().delete(dispenser.id).await?;
    Ok(success())
}
