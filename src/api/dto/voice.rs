/*
 * Responsibility
 * - Google Smart Home / Alexa Smart Home の request DTO
 * - provider が決めた response envelope の組み立て (field filter は通さない)
 */
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

pub const GOOGLE_SYNC: &str = "action.devices.SYNC";
pub const GOOGLE_EXECUTE: &str = "action.devices.EXECUTE";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoogleRequest {
    pub request_id: String,
    pub inputs: Vec<GoogleInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoogleInput {
    pub intent: String,
}

impl GoogleRequest {
    /// Intent of the first input; Google sends one per request.
    pub fn intent(&self) -> Option<&str> {
        self.inputs.first().map(|input| input.intent.as_str())
    }
}

pub fn google_response(request_id: &str, payload: Value) -> Value {
    json!({
        "requestId": request_id,
        "payload": payload,
    })
}

pub fn google_devices(agent_user_id: Uuid) -> Value {
    json!({
        "agentUserId": agent_user_id,
        "devices": [{
            "id": "tespo dispenser",
            "type": "action.devices.types.MICROWAVE",
            "traits": ["action.devices.traits.StartStop"],
            "name": {
                "defaultNames": ["Tespo Connect Dispenser", "Vitamin Dispenser"],
                "name": "Dispenser",
                "nicknames": ["Kitchen Dispenser"],
            },
            "willReportState": false,
            "attributes": {
                "pausable": false,
                "availableZones": ["Kitchen", "Bathroom"],
            },
        }],
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlexaRequest {
    pub directive: AlexaDirective,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlexaDirective {
    pub header: AlexaHeader,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlexaHeader {
    pub namespace: String,
    pub name: String,
    pub message_id: String,
    pub payload_version: String,
}

pub fn alexa_discovery(message_id: &str) -> Value {
    json!({
        "event": {
            "header": {
                "namespace": "Alexa.Discovery",
                "name": "Discover.Response",
                "payloadVersion": "3",
                "messageId": message_id,
            },
            "payload": {
                "endpoints": [{
                    "endpointId": "dispense321",
                    "friendlyName": "Dispenser",
                    "description": "Tespo Connect Dispenser",
                    "manufacturerName": "Tespo",
                    "displayCategories": ["OTHER"],
                    "cookie": {},
                    "capabilities": [{
                        "type": "AlexaInterface",
                        "interface": "Alexa.PowerController",
                        "version": "3",
                        "properties": {
                            "supported": [{ "name": "powerState" }],
                            "proactivelyReported": true,
                            "retrievable": true,
                        },
                    }],
                    "additionalAttributes": {
                        "manufacturer": "Tespo",
                        "model": "Model 2",
                        "serialNumber": "123",
                        "firmwareVersion": "1",
                        "softwareVersion": "1",
                        "customIdentifier": "1",
                    },
                }],
            },
        },
    })
}

pub fn alexa_turned_on(message_id: &str, at: DateTime<Utc>) -> Value {
    json!({
        "context": {
            "properties": [{
                "namespace": "Alexa.ToggleController",
                "name": "toggleState",
                "value": "ON",
                "timeOfSample": at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }],
        },
        "event": {
            "header": {
                "namespace": "Alexa",
                "name": "Response",
                "payloadVersion": "3",
                "messageId": message_id,
            },
            "payload": {},
        },
    })
}
