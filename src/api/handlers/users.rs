/*
 * Responsibility
 * - implicit: 自分自身 (GET/PUT /user) と account 内 users の CRUD
 *   - 削除は owner のみ。自分自身は削除不可。対象 user の regimen / usage は切り離す
 * - trusted: 外部 (WordPress) id による user 更新
 */
use axum::{Json, extract::State};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::api::dto::users::ExternalUserUpdate;
use crate::api::extractors::{
    AuthContextExtractor, JsonBody, Paginated, Pagination, Params,
};
use crate::api::handlers::{changes, owned, patch_owned, success};
use crate::error::AppError;
use crate::repos::entities::{Regimen, Usage, User};
use crate::repos::{Filter, Repo};
use crate::state::AppState;

pub async fn show_self(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
) -> Result<Json<Value>, AppError> {
    let user = state.repo::<User>().get(ctx.require_user()?).await?;
    Ok(Json(ctx.visible(&user)?))
}

/// Callers cannot change their own account or owner flag.
pub async fn update_self(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let user_id = ctx.require_user()?;
    let account_id = ctx.require_account()?;

    let mut changes = changes(body)?;
    changes.remove("owner");
    changes.insert("account_id".into(), json!(account_id));

    let user = state.repo::<User>().patch(user_id, changes).await?;
    Ok(Json(ctx.visible(&user)?))
}

pub async fn list_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let users = state
        .repo::<User>()
        .find(
            Filter::new().eq("account_id", ctx.require_account()?),
            Some(pagination.page()),
        )
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&users)?)))
}

pub async fn show_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(user_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user = owned(
        &state.repo::<User>(),
        user_id,
        "account_id",
        ctx.require_account()?,
    )
    .await?;

    Ok(Json(ctx.visible(&user)?))
}

/// Ownership is not assignable through the account routes.
pub async fn update_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(user_id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let mut changes = changes(body)?;
    changes.remove("owner");

    let user = patch_owned(
        &state.repo::<User>(),
        user_id,
        "account_id",
        ctx.require_account()?,
        Value::Object(changes),
    )
    .await?;

    Ok(Json(ctx.visible(&user)?))
}

pub async fn create_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    JsonBody(mut user): JsonBody<User>,
) -> Result<Json<Value>, AppError> {
    user.id = Uuid::nil();
    user.account_id = Some(ctx.require_account()?);
    user.owner = false;

    let user = state.repo::<User>().create(&user).await?;
    Ok(Json(ctx.visible(&user)?))
}

pub async fn delete_account(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(user_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let caller_id = ctx.require_user()?;
    let account_id = ctx.require_account()?;

    if user_id == caller_id {
        return Err(AppError::bad_request("cannot delete yourself"));
    }

    let users = state.repo::<User>();
    let caller = users.get(caller_id).await?;
    if !caller.owner {
        return Err(AppError::Unauthorized("owner operation only".into()));
    }

    let target = owned(&users, user_id, "account_id", account_id).await?;
    detach_history(&state, target.id).await?;
    users.delete(target.id).await?;

    tracing::info!(user_id = %target.id, by = %caller_id, "account user deleted");
    Ok(success())
}

/// Regimens of `user_id` and their usages outlive the user, unassigned.
async fn detach_history(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    let regimens: Repo<Regimen> = state.repo();
    let usages: Repo<Usage> = state.repo();

    let mut unassigned = Map::new();
    unassigned.insert("user_id".into(), Value::Null);

    for regimen in regimens
        .find(Filter::new().eq("user_id", user_id), None)
        .await?
    {
        for usage in usages
            .find(Filter::new().eq("regimen_id", regimen.id), None)
            .await?
        {
            usages.patch(usage.id, unassigned.clone()).await?;
        }
        regimens.patch(regimen.id, unassigned.clone()).await?;
    }

    Ok(())
}

/// Unknown external ids are a 400, and the full record comes back.
pub async fn update_by_external_id(
    State(state): State<AppState>,
    Params(external_id): Params<String>,
    JsonBody(update): JsonBody<ExternalUserUpdate>,
) -> Result<Json<User>, AppError> {
    let users = state.repo::<User>();
    let mut user = users
        .find_optional(Filter::new().eq("external_id", &external_id))
        .await?
        .ok_or_else(|| AppError::bad_request("error getting user by external id"))?;

    update.apply_to(&mut user);
    Ok(Json(users.update(&user).await?))
}
