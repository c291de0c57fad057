/*
 * Responsibility
 * - implicit: 自分の account の参照 / 更新 (response は scoped_fields で filter)
 * - explicit: 任意 account の users 一覧 / 作成 / 更新 / 削除
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::extractors::{AuthContextExtractor, JsonBody, Paginated, Pagination, Params};
use crate::api::handlers::{changes, owned, same_id, success};
use crate::error::AppError;
use crate::repos::Filter;
use crate::repos::entities::{Account, User};
use crate::state::AppState;

pub async fn show_own(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
) -> Result<Json<Value>, AppError> {
    let account = state.repo::<Account>().get(ctx.require_account()?).await?;
    Ok(Json(ctx.visible(&account)?))
}

/// The body is merged onto the caller's account whatever `id` it carries.
pub async fn update_own(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let account_id = ctx.require_account()?;
    let account = state
        .repo::<Account>()
        .patch(account_id, changes(body)?)
        .await?;

    Ok(Json(ctx.visible(&account)?))
}

pub async fn list_users(
    State(state): State<AppState>,
    Params(account_id): Params<Uuid>,
    pagination: Pagination,
) -> Result<Json<Paginated<User>>, AppError> {
    state.repo::<Account>().get(account_id).await?;

    let users = state
        .repo::<User>()
        .find(
            Filter::new().eq("account_id", account_id),
            Some(pagination.page()),
        )
        .await?;

    Ok(Json(pagination.wrap(users)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Params(account_id): Params<Uuid>,
    JsonBody(mut user): JsonBody<User>,
) -> Result<Json<User>, AppError> {
    state.repo::<Account>().get(account_id).await?;

    user.account_id = Some(account_id);
    Ok(Json(state.repo::<User>().create(&user).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    Params((account_id, user_id)): Params<(Uuid, Uuid)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<User>, AppError> {
    let mut changes = changes(body)?;
    same_id(&changes, user_id, "user")?;

    changes.insert("account_id".into(), json!(account_id));
    Ok(Json(state.repo::<User>().patch(user_id, changes).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Params((account_id, user_id)): Params<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let users = state.repo::<User>();
    owned(&users, user_id, "account_id", account_id).await?;
    users.delete(user_id).await?;

    Ok(success())
}
