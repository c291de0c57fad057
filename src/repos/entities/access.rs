use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Role {
    const TABLE: &'static str = "roles";
    const SCOPE: &'static str = "role";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A registry entry consulted by the remote validator: route pattern + method.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Permission {
    pub id: Uuid,
    pub route: String,
    pub method: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Permission {
    const TABLE: &'static str = "permissions";
    const SCOPE: &'static str = "permission";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "route",
        "method",
        "description",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RolePermission {
    pub id: Uuid,
    pub role_id: Uuid,
    pub permission_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for RolePermission {
    const TABLE: &'static str = "role_permissions";
    const SCOPE: &'static str = "role_permission";
    const COLUMNS: &'static [&'static str] =
        &["id", "role_id", "permission_id", "created_at", "updated_at"];
    const SOFT_DELETE: bool = false;

    fn id(&self) -> Uuid {
        self.id
    }
}
