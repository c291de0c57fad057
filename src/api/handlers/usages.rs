/*
 * Responsibility
 * - implicit: usage の一覧 / 参照 / 更新
 *   - /account/usages は account_id、/user/usages は user_id で絞る
 */
use axum::{Json, extract::State};
use serde_json::Value;
use uuid::Uuid;

use crate::api::extractors::{
    AuthContext, AuthContextExtractor, JsonBody, Paginated, Pagination, Params,
};
use crate::api::handlers::{owned, patch_owned};
use crate::error::AppError;
use crate::repos::Filter;
use crate::repos::entities::Usage;
use crate::state::AppState;

async fn list_by(
    state: &AppState,
    ctx: &AuthContext,
    column: &'static str,
    owner: Uuid,
    pagination: &Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let usages = state
        .repo::<Usage>()
        .find(Filter::new().eq(column, owner), Some(pagination.page()))
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&usages)?)))
}

pub async fn list_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let account_id = ctx.require_account()?;
    list_by(&state, &ctx, "account_id", account_id, &pagination).await
}

pub async fn list_user(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let user_id = ctx.require_user()?;
    list_by(&state, &ctx, "user_id", user_id, &pagination).await
}

pub async fn show_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(usage_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let usage = owned(
        &state.repo::<Usage>(),
        usage_id,
        "account_id",
        ctx.require_account()?,
    )
    .await?;

    Ok(Json(ctx.visible(&usage)?))
}

pub async fn show_user(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(usage_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let usage = owned(&state.repo::<Usage>(), usage_id, "user_id", ctx.require_user()?).await?;
    Ok(Json(ctx.visible(&usage)?))
}

pub async fn update_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(usage_id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let usage = patch_owned(
        &state.repo::<Usage>(),
        usage_id,
        "account_id",
        ctx.require_account()?,
        body,
    )
    .await?;

    Ok(Json(ctx.visible(&usage)?))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(usage_id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let usage = patch_owned(
        &state.repo::<Usage>(),
        usage_id,
        "user_id",
        ctx.require_user()?,
        body,
    )
    .await?;

    Ok(Json(ctx.visible(&usage)?))
}
