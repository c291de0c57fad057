/*
 * Responsibility
 * - explicit: role と permission の紐付け (一覧 / 付与 / 剥奪)
 * - 付与は冪等 (既に紐付いていれば何もしない)
 */
use axum::{Json, extract::State};
use serde::Serialize;
use uuid::Uuid;

use crate::api::extractors::Params;
use crate::api::handlers::success;
use crate::error::AppError;
use crate::repos::Filter;
use crate::repos::entities::{Permission, Role, RolePermission};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

async fn load(state: &AppState, role_id: Uuid) -> Result<RoleWithPermissions, AppError> {
    let role = state.repo::<Role>().get(role_id).await?;
    let links = state
        .repo::<RolePermission>()
        .find(Filter::new().eq("role_id", role_id), None)
        .await?;

    let repo = state.repo::<Permission>();
    let mut permissions = Vec::with_capacity(links.len());
    for link in links {
        permissions.push(repo.get(link.permission_id).await?);
    }

    Ok(RoleWithPermissions { role, permissions })
}

pub async fn with_permissions(
    State(state): State<AppState>,
    Params(role_id): Params<Uuid>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    Ok(Json(load(&state, role_id).await?))
}

pub async fn attach_permission(
    State(state): State<AppState>,
    Params((role_id, permission_id)): Params<(Uuid, Uuid)>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    state.repo::<Role>().get(role_id).await?;
    state.repo::<Permission>().get(permission_id).await?;

    let links = state.repo::<RolePermission>();
    let existing = links
        .find_optional(
            Filter::new()
                .eq("role_id", role_id)
                .eq("permission_id", permission_id),
        )
        .await?;

    if existing.is_none() {
        links
            .create(&RolePermission {
                role_id,
                permission_id,
                ..Default::default()
            })
            .await?;
        tracing::info!(role = %role_id, permission = %permission_id, "permission attached");
    }

    Ok(Json(load(&state, role_id).await?))
}

pub async fn detach_permission(
    State(state): State<AppState>,
    Params((role_id, permission_id)): Params<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let links = state.repo::<RolePermission>();
    let link = links
        .find_one(
            Filter::new()
                .eq("role_id", role_id)
                .eq("permission_id", permission_id),
        )
        .await?;
    links.delete(link.id).await?;

    Ok(success())
}
