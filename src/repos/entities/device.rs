use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Dispenser {
    pub id: Uuid,
    pub serial: String,
    pub name: String,
    /// Firmware versions reported by the device (`pcb`, `wifi`, `controller`).
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Dispenser {
    const TABLE: &'static str = "dispensers";
    const SCOPE: &'static str = "dispenser";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "serial",
        "name",
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
pub struct Pod {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub servings: i32,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Pod {
    const TABLE: &'static str = "pods";
    const SCOPE: &'static str = "pod";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "servings",
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
pub struct Barcode {
    pub id: Uuid,
    pub pod_id: Option<Uuid>,
    pub code: String,
    pub label_tall: Option<String>,
    pub label_wide: Option<String>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Barcode {
    const TABLE: &'static str = "barcodes";
    const SCOPE: &'static str = "barcode";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "pod_id",
        "code",
        "label_tall",
        "label_wide",
        "meta",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Link between an account and a physical dispenser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Connection {
    pub id: Uuid,
    pub account_id: Uuid,
    pub dispenser_id: Uuid,
    pub connected_at: Option<DateTime<Utc>>,
    pub disconnected_at: Option<DateTime<Utc>>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Connection {
    const TABLE: &'static str = "connections";
    const SCOPE: &'static str = "connection";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "account_id",
        "dispenser_id",
        "connected_at",
        "disconnected_at",
        "meta",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A pod placed into a dispenser slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Insertion {
    pub id: Uuid,
    pub regimen_id: Uuid,
    pub dispenser_id: Uuid,
    pub barcode_id: Option<Uuid>,
    pub flags: i32,
    pub label_tall: Option<String>,
    pub label_wide: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Insertion {
    const TABLE: &'static str = "insertions";
    const SCOPE: &'static str = "insertion";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "regimen_id",
        "dispenser_id",
        "barcode_id",
        "flags",
        "label_tall",
        "label_wide",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}
