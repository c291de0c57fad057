/*
 * Responsibility
 * - implicit: reminder の一覧 (regimen 単位 / user 単位)、作成、更新、削除 (soft)
 * - regimen は caller の account のもの、reminder は caller 自身のものに限る
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::extractors::{
    AuthContext, AuthContextExtractor, JsonBody, Paginated, Pagination, Params,
};
use crate::api::handlers::{changes, owned, same_id, success};
use crate::error::AppError;
use crate::repos::Filter;
use crate::repos::entities::{Regimen, Reminder};
use crate::state::AppState;

async fn callers_regimen(
    state: &AppState,
    ctx: &AuthContext,
    regimen_id: Uuid,
) -> Result<Regimen, AppError> {
    owned(
        &state.repo::<Regimen>(),
        regimen_id,
        "account_id",
        ctx.require_account()?,
    )
    .await
}

async fn callers_reminder(
    state: &AppState,
    ctx: &AuthContext,
    regimen_id: Uuid,
    reminder_id: Uuid,
) -> Result<Reminder, AppError> {
    Ok(state
        .repo::<Reminder>()
        .find_one(
            Filter::by_id(reminder_id)
                .eq("regimen_id", regimen_id)
                .eq("user_id", ctx.require_user()?),
        )
        .await?)
}

pub async fn list_regimen(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(regimen_id): Params<Uuid>,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let regimen = callers_regimen(&state, &ctx, regimen_id).await?;

    let reminders = state
        .repo::<Reminder>()
        .find(
            Filter::new()
                .eq("regimen_id", regimen.id)
                .eq("user_id", ctx.require_user()?),
            Some(pagination.page()),
        )
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&reminders)?)))
}

pub async fn list_user(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let reminders = state
        .repo::<Reminder>()
        .find(
            Filter::new().eq("user_id", ctx.require_user()?),
            Some(pagination.page()),
        )
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&reminders)?)))
}

pub async fn create(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(regimen_id): Params<Uuid>,
    JsonBody(mut reminder): JsonBody<Reminder>,
) -> Result<Json<Value>, AppError> {
    let regimen = callers_regimen(&state, &ctx, regimen_id).await?;

    reminder.id = Uuid::nil();
    reminder.regimen_id = regimen.id;
    reminder.user_id = ctx.require_user()?;
    reminder.account_id = regimen.account_id;

    let reminder = state.repo::<Reminder>().create(&reminder).await?;
    Ok(Json(ctx.visible(&reminder)?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params((regimen_id, reminder_id)): Params<(Uuid, Uuid)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let mut changes = changes(body)?;
    same_id(&changes, reminder_id, "reminder")?;
    let current = callers_reminder(&state, &ctx, regimen_id, reminder_id).await?;

    changes.insert("regimen_id".into(), json!(current.regimen_id));
    changes.insert("user_id".into(), json!(current.user_id));
    changes.insert("account_id".into(), json!(current.account_id));

    let reminder = state.repo::<Reminder>().patch(reminder_id, changes).await?;
    Ok(Json(ctx.visible(&reminder)?))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params((regimen_id, reminder_id)): Params<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let reminder = callers_reminder(&state, &ctx, regimen_id, reminder_id).await?;
    state.repo::<Reminder>().delete(reminder.id).await?;

    Ok(success())
}
