/*
 * Responsibility
 * - dispenser event function から届く message の DTO
 * - dispense function に渡す payload の組み立て
 */
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::repos::entities::Dispenser;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LambdaMessage {
    pub payload: EventPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    pub customer: Customer,
    pub dispenser: DispenserReport,
    pub pod: PodReport,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Customer {
    /// Account id.
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DispenserReport {
    pub serial: String,
    pub name: String,
    pub controller_firmware_version: String,
    pub wifi_firmware_version: String,
    pub pcb_firmware_version: String,
}

impl DispenserReport {
    /// Stored as the dispenser's `meta`.
    pub fn firmware_meta(&self) -> Value {
        json!({
            "pcb": { "version": self.pcb_firmware_version },
            "wifi": { "version": self.wifi_firmware_version },
            "controller": { "version": self.controller_firmware_version },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PodReport {
    pub barcode: String,
    pub servings_remaining: i32,
    pub flags: i32,
}

#[derive(Debug, Serialize)]
pub struct DispenseTarget {
    pub serial: String,
    pub name: String,
}

/// Payload of the dispense function: which account, which dispenser.
#[derive(Debug, Serialize)]
pub struct DispenseCommand {
    pub customer: Customer,
    pub dispenser: DispenseTarget,
}

impl DispenseCommand {
    pub fn new(account_id: Uuid, dispenser: &Dispenser) -> Self {
        Self {
            customer: Customer { id: account_id },
            dispenser: DispenseTarget {
                serial: dispenser.serial.clone(),
                name: dispenser.name.clone(),
            },
        }
    }
}
