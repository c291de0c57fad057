use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Account {
    const TABLE: &'static str = "accounts";
    const SCOPE: &'static str = "account";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "meta", "created_at", "updated_at", "deleted_at"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// `owner` marks the account holder; only owners may remove other members.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct User {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub external_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub owner: bool,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const SCOPE: &'static str = "user";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "account_id",
        "external_id",
        "first_name",
        "last_name",
        "email",
        "owner",
        "meta",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}
