/*
 * Responsibility
 * - implicit: regimen の一覧 / 参照 (account 単位 / user 単位)、更新 / 削除 (account 単位)
 * - pod 未設定の regimen に pod を割り当てた結果、同じ pod の regimen が account に既にある場合は
 *   既存 regimen へ usage と残量を寄せて、こちらを削除する
 */
use axum::{Json, extract::State};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::api::extractors::{
    AuthContext, AuthContextExtractor, JsonBody, Paginated, Pagination, Params,
};
use crate::api::handlers::{changes, owned, same_id, success};
use crate::error::AppError;
use crate::repos::entities::{Regimen, Usage};
use crate::repos::{Filter, Repo};
use crate::state::AppState;

async fn list_by(
    state: &AppState,
    ctx: &AuthContext,
    column: &'static str,
    owner: Uuid,
    pagination: &Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let regimens = state
        .repo::<Regimen>()
        .find(Filter::new().eq(column, owner), Some(pagination.page()))
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&regimens)?)))
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
    Params(regimen_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let regimen = owned(
        &state.repo::<Regimen>(),
        regimen_id,
        "account_id",
        ctx.require_account()?,
    )
    .await?;

    Ok(Json(ctx.visible(&regimen)?))
}

pub async fn show_user(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(regimen_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let regimen = owned(
        &state.repo::<Regimen>(),
        regimen_id,
        "user_id",
        ctx.require_user()?,
    )
    .await?;

    Ok(Json(ctx.visible(&regimen)?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(regimen_id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let account_id = ctx.require_account()?;
    let regimens = state.repo::<Regimen>();

    let mut changes = changes(body)?;
    same_id(&changes, regimen_id, "regimen")?;
    let current = owned(&regimens, regimen_id, "account_id", account_id).await?;

    let assigned_pod = changes
        .get("pod_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok());

    if let (None, Some(pod_id)) = (current.pod_id, assigned_pod) {
        let existing = regimens
            .find_optional(
                Filter::new()
                    .eq("account_id", account_id)
                    .eq("pod_id", pod_id),
            )
            .await?;

        if let Some(existing) = existing {
            let merged = fold_into(&state, current, existing).await?;
            return Ok(Json(ctx.visible(&merged)?));
        }
    }

    changes.insert("account_id".into(), json!(account_id));
    let regimen = regimens.patch(regimen_id, changes).await?;
    Ok(Json(ctx.visible(&regimen)?))
}

/// Moves `from`'s usages and last reported servings onto `into`, then deletes `from`.
async fn fold_into(state: &AppState, from: Regimen, mut into: Regimen) -> Result<Regimen, AppError> {
    let regimens: Repo<Regimen> = state.repo();
    let usages: Repo<Usage> = state.repo();

    let mut moved = Map::new();
    moved.insert("regimen_id".into(), json!(into.id));
    for usage in usages
        .find(Filter::new().eq("regimen_id", from.id), None)
        .await?
    {
        usages.patch(usage.id, moved.clone()).await?;
    }

    into.last_reported_servings_remaining = from.last_reported_servings_remaining;
    let into = regimens.update(&into).await?;
    regimens.delete(from.id).await?;

    tracing::info!(from = %from.id, into = %into.id, "regimen merged");
    Ok(into)
}

pub async fn remove(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(regimen_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let regimens = state.repo::<Regimen>();
    owned(&regimens, regimen_id, "account_id", ctx.require_account()?).await?;
    regimens.delete(regimen_id).await?;

    Ok(success())
}
