/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 * - scoped_fields による response の redaction もこの型から行う
 *
 * Notes
 * - token 検証 / claims decode は middleware / services 側の責務
 * - 1 request につき 1 度だけ作られ、以後 immutable
 */

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::entities::Entity;
use crate::services::claims::{ScopedClaims, VoiceClaims};
use crate::services::scoping::{self, ScopePattern};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - trusted / explicit route では identity は空 (caller は fully privileged)
/// - implicit route では claims 由来の user / account / owner / scopes / visible fields
/// - voice route では user_id のみ
/// - `raw_token` は diagnostics と downstream への受け渡し用
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub owner: bool,
    pub granted_scopes: Vec<ScopePattern>,
    pub visible_fields: Vec<ScopePattern>,
    pub raw_token: Option<String>,
}

impl AuthContext {
    pub fn trusted(raw_token: Option<String>) -> Self {
        Self {
            raw_token,
            ..Default::default()
        }
    }

    pub fn scoped(claims: ScopedClaims, raw_token: String) -> Self {
        Self {
            user_id: Some(claims.user_id),
            account_id: Some(claims.account_id),
            owner: claims.owner,
            granted_scopes: claims.scope_permissions,
            visible_fields: claims.scoped_fields,
            raw_token: Some(raw_token),
        }
    }

    pub fn voice(claims: VoiceClaims, raw_token: String) -> Self {
        Self {
            user_id: Some(claims.user_id),
            raw_token: Some(raw_token),
            ..Default::default()
        }
    }

    pub fn require_user(&self) -> Result<Uuid, AppError> {
        self.user_id
            .ok_or_else(|| AppError::internal("cannot process token claims"))
    }

    pub fn require_account(&self) -> Result<Uuid, AppError> {
        self.account_id
            .ok_or_else(|| AppError::internal("cannot process token claims"))
    }

    /// `entity` redacted to the caller's visible fields, rooted at the entity's scope name.
    pub fn visible<E: Entity>(&self, entity: &E) -> Result<Value, AppError> {
        self.visible_as(E::SCOPE, entity)
    }

    pub fn visible_all<E: Entity>(&self, entities: &[E]) -> Result<Vec<Value>, AppError> {
        entities.iter().map(|entity| self.visible(entity)).collect()
    }

    pub fn visible_as<T: Serialize>(&self, root: &str, value: &T) -> Result<Value, AppError> {
        let value = serde_json::to_value(value)?;
        Ok(scoping::filter(&self.visible_fields, root, &value))
    }
}
