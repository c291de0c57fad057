use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Invitation {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Stored lower-cased.
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl Entity for Invitation {
    const TABLE: &'static str = "invitations";
    const SCOPE: &'static str = "invitation";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "account_id",
        "email",
        "code",
        "expires_at",
        "meta",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}
