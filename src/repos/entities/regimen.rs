use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Regimen {
    pub id: Uuid,
    pub account_id: Uuid,
    pub user_id: Option<Uuid>,
    pub pod_id: Option<Uuid>,
    pub last_reported_servings_remaining: i32,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Regimen {
    const TABLE: &'static str = "regimens";
    const SCOPE: &'static str = "regimen";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "account_id",
        "user_id",
        "pod_id",
        "last_reported_servings_remaining",
        "meta",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// One dispense event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Usage {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub regimen_id: Option<Uuid>,
    pub dispenser_id: Uuid,
    pub user_id: Option<Uuid>,
    pub barcode_id: Option<Uuid>,
    pub servings: i32,
    pub flags: i32,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Usage {
    const TABLE: &'static str = "usages";
    const SCOPE: &'static str = "usage";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "account_id",
        "regimen_id",
        "dispenser_id",
        "user_id",
        "barcode_id",
        "servings",
        "flags",
        "meta",
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
pub struct Reminder {
    pub id: Uuid,
    pub regimen_id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    /// Local time of day, `HH:MM`.
    pub remind_at: String,
    pub days: Vec<String>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Reminder {
    const TABLE: &'static str = "reminders";
    const SCOPE: &'static str = "reminder";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "regimen_id",
        "user_id",
        "account_id",
        "remind_at",
        "days",
        "meta",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}
