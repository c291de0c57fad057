/*
 * Responsibility
 * - route table から参照される handler 群
 * - handler 共通の小さな helper (success body, 更新 body の検査, 所有チェック)
 *
 * Notes
 * - implicit handler は AuthContext の account / user だけで storage を絞る
 * - explicit / trusted handler の response は filter しない
 */
use axum::Json;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::entities::Entity;
use crate::repos::{Filter, Repo};

pub mod accounts;
pub mod barcodes;
pub mod connections;
pub mod crud;
pub mod dispensers;
pub mod fallback;
pub mod fulfillment;
pub mod health;
pub mod invitations;
pub mod lambda;
pub mod regimens;
pub mod reminders;
pub mod roles;
pub mod usages;
pub mod users;

pub(crate) fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

/// Top-level fields of an update body.
pub(crate) fn changes(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::bad_request("request body must be a JSON object")),
    }
}

/// A body `id`, when present, must name the record in the path.
pub(crate) fn same_id(
    changes: &Map<String, Value>,
    id: Uuid,
    resource: &str,
) -> Result<(), AppError> {
    match changes.get("id") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(raw)) if Uuid::parse_str(raw).ok() == Some(id) => Ok(()),
        Some(_) => Err(AppError::bad_request(format!("cannot update {resource} id"))),
    }
}

/// Record `id` if `column` equals `owner`, otherwise 404.
pub(crate) async fn owned<E: Entity>(
    repo: &Repo<E>,
    id: Uuid,
    column: &'static str,
    owner: Uuid,
) -> Result<E, AppError> {
    Ok(repo.find_one(Filter::by_id(id).eq(column, owner)).await?)
}

/// Merges `body` onto a record the caller owns; the ownership column cannot move.
pub(crate) async fn patch_owned<E: Entity>(
    repo: &Repo<E>,
    id: Uuid,
    column: &'static str,
    owner: Uuid,
    body: Value,
) -> Result<E, AppError> {
    let mut changes = changes(body)?;
    same_id(&changes, id, E::SCOPE)?;
    owned(repo, id, column, owner).await?;

    changes.insert(column.into(), json!(owner));
    Ok(repo.patch(id, changes).await?)
}

/// Soft-deletes `id`, leaving `meta` as the reason.
pub(crate) async fn retire<E: Entity>(repo: &Repo<E>, id: Uuid, meta: &Value) -> Result<(), AppError> {
    Ok(repo.retire(id, Some(meta.clone())).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_id_accepts_missing_or_matching_ids() {
        let id = Uuid::new_v4();
        let ok = |body: Value| same_id(&changes(body).unwrap(), id, "user");

        assert!(ok(json!({ "name": "x" })).is_ok());
        assert!(ok(json!({ "id": null })).is_ok());
        assert!(ok(json!({ "id": id })).is_ok());

        let err = ok(json!({ "id": Uuid::new_v4() })).unwrap_err();
        assert_eq!(err.to_string(), "cannot update user id");
        assert!(ok(json!({ "id": 7 })).is_err());
    }

    #[test]
    fn update_bodies_must_be_objects() {
        assert!(matches!(
            changes(json!(["not", "an", "object"])),
            Err(AppError::BadRequest(_))
        ));
    }
}
