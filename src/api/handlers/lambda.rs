/*
 * Responsibility
 * - trusted: dispenser event function (dispensed / inserted / connected / disconnected) の callback
 * - event ごとに usage / insertion / regimen / connection を記録し、firmware version を dispenser meta に残す
 *
 * Notes
 * - customer.id は account id
 * - dispensed / inserted は account に接続中の dispenser だけを対象にする
 */
use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::api::dto::lambda::{DispenserReport, LambdaMessage};
use crate::api::extractors::JsonBody;
use crate::api::handlers::connections::disconnect;
use crate::api::handlers::success;
use crate::error::AppError;
use crate::repos::entities::{
    Account, Barcode, Connection, Dispenser, Insertion, Pod, Regimen, Usage, User,
};
use crate::repos::{Filter, queries};
use crate::state::AppState;

async fn connected_dispenser(
    state: &AppState,
    account_id: Uuid,
    serial: &str,
) -> Result<Option<Dispenser>, AppError> {
    Ok(queries::account_dispensers(&state.store, account_id, None)
        .await?
        .into_iter()
        .find(|dispenser| dispenser.serial == serial))
}

async fn barcode_by_code(state: &AppState, code: &str) -> Result<Option<Barcode>, AppError> {
    if code.is_empty() {
        return Ok(None);
    }
    Ok(state
        .repo::<Barcode>()
        .find_optional(Filter::new().eq("code", code))
        .await?)
}

async fn record_firmware(
    state: &AppState,
    dispenser_id: Uuid,
    report: &DispenserReport,
) -> Result<(), AppError> {
    let mut changes = Map::new();
    changes.insert("meta".into(), report.firmware_meta());
    state.repo::<Dispenser>().patch(dispenser_id, changes).await?;
    Ok(())
}

/// Regimen behind a dispense: the barcode's insertion when the barcode is known,
/// otherwise the dispenser's latest insertion.
async fn dispensed_regimen(
    state: &AppState,
    dispenser_id: Uuid,
    barcode: Option<&Barcode>,
) -> Result<Regimen, AppError> {
    let insertions = state.repo::<Insertion>();
    let by_dispenser = Filter::new().eq("dispenser_id", dispenser_id);

    let insertion = match barcode {
        Some(barcode) => {
            insertions
                .find_one(by_dispenser.eq("barcode_id", barcode.id))
                .await?
        }
        None => insertions.find_one(by_dispenser.newest_first()).await?,
    };

    Ok(state.repo::<Regimen>().get(insertion.regimen_id).await?)
}

pub async fn dispensed(
    State(state): State<AppState>,
    JsonBody(message): JsonBody<LambdaMessage>,
) -> Result<Json<Value>, AppError> {
    let event = message.payload;
    let account_id = event.customer.id;

    let dispenser = connected_dispenser(&state, account_id, &event.dispenser.serial)
        .await?
        .ok_or_else(|| AppError::NotFound("dispenser cannot be found".into()))?;
    let barcode = barcode_by_code(&state, &event.pod.barcode).await?;
    let mut regimen = dispensed_regimen(&state, dispenser.id, barcode.as_ref()).await?;

    state
        .repo::<Usage>()
        .create(&Usage {
            account_id: Some(regimen.account_id),
            regimen_id: Some(regimen.id),
            dispenser_id: dispenser.id,
            user_id: regimen.user_id,
            barcode_id: barcode.as_ref().map(|barcode| barcode.id),
            servings: event.pod.servings_remaining,
            flags: event.pod.flags,
            ..Default::default()
        })
        .await?;

    regimen.last_reported_servings_remaining = event.pod.servings_remaining;
    state.repo::<Regimen>().update(&regimen).await?;
    record_firmware(&state, dispenser.id, &event.dispenser).await?;

    tracing::info!(dispenser = %dispenser.id, regimen = %regimen.id, "dispense recorded");
    Ok(success())
}

pub async fn inserted(
    State(state): State<AppState>,
    JsonBody(message): JsonBody<LambdaMessage>,
) -> Result<Json<Value>, AppError> {
    let event = message.payload;
    let serial = &event.dispenser.serial;

    let account = state.repo::<Account>().get(event.customer.id).await?;
    let dispenser = connected_dispenser(&state, account.id, serial)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("could not find dispenser with serial {serial}"))
        })?;

    let users = state
        .repo::<User>()
        .find(Filter::new().eq("account_id", account.id), None)
        .await?;
    let user_id = match users.as_slice() {
        [only] => Some(only.id),
        _ => None,
    };

    let barcode = barcode_by_code(&state, &event.pod.barcode).await?;
    let pod = match barcode.as_ref().and_then(|barcode| barcode.pod_id) {
        Some(pod_id) => state.repo::<Pod>().find_optional(Filter::by_id(pod_id)).await?,
        None => None,
    };

    let regimens = state.repo::<Regimen>();
    let existing = match &pod {
        Some(pod) => {
            regimens
                .find_optional(
                    Filter::new()
                        .eq("pod_id", pod.id)
                        .eq("account_id", account.id),
                )
                .await?
        }
        None => None,
    };

    let regimen = match existing {
        Some(mut regimen) => {
            regimen.last_reported_servings_remaining = event.pod.servings_remaining;
            regimens.update(&regimen).await?
        }
        None => {
            regimens
                .create(&Regimen {
                    account_id: account.id,
                    user_id,
                    pod_id: pod.as_ref().map(|pod| pod.id),
                    last_reported_servings_remaining: event.pod.servings_remaining,
                    ..Default::default()
                })
                .await?
        }
    };

    state
        .repo::<Insertion>()
        .create(&Insertion {
            regimen_id: regimen.id,
            dispenser_id: dispenser.id,
            barcode_id: barcode.as_ref().map(|barcode| barcode.id),
            flags: event.pod.flags,
            label_tall: barcode.as_ref().and_then(|barcode| barcode.label_tall.clone()),
            label_wide: barcode.as_ref().and_then(|barcode| barcode.label_wide.clone()),
            ..Default::default()
        })
        .await?;
    record_firmware(&state, dispenser.id, &event.dispenser).await?;

    tracing::info!(dispenser = %dispenser.id, regimen = %regimen.id, "pod insertion recorded");
    Ok(success())
}

pub async fn connected(
    State(state): State<AppState>,
    JsonBody(message): JsonBody<LambdaMessage>,
) -> Result<Json<Value>, AppError> {
    let event = message.payload;
    let account_id = event.customer.id;
    let connections = state.repo::<Connection>();

    let live = connections
        .find_optional(Filter::new().eq("account_id", account_id))
        .await?;
    if live.is_some() {
        return Err(AppError::bad_request("account already has connection"));
    }

    let dispenser = state
        .repo::<Dispenser>()
        .find_one(Filter::new().eq("serial", &event.dispenser.serial))
        .await?;
    record_firmware(&state, dispenser.id, &event.dispenser).await?;

    let existing = connections
        .find_optional(Filter::new().eq("dispenser_id", dispenser.id))
        .await?;
    if existing.is_some() {
        return Err(AppError::bad_request("connection already exists"));
    }

    let connection = connections
        .create(&Connection {
            account_id,
            dispenser_id: dispenser.id,
            connected_at: Some(Utc::now()),
            ..Default::default()
        })
        .await?;

    tracing::info!(connection = %connection.id, dispenser = %dispenser.id, "dispenser connected");
    Ok(success())
}

pub async fn disconnected(
    State(state): State<AppState>,
    JsonBody(message): JsonBody<LambdaMessage>,
) -> Result<Json<Value>, AppError> {
    let event = message.payload;

    let dispenser = state
        .repo::<Dispenser>()
        .find_one(Filter::new().eq("serial", &event.dispenser.serial))
        .await?;
    let connections = state.repo::<Connection>();
    let connection = connections
        .find_one(Filter::new().eq("dispenser_id", dispenser.id))
        .await?;

    disconnect(&connections, connection.id).await?;

    tracing::info!(connection = %connection.id, dispenser = %dispenser.id, "dispenser disconnected");
    Ok(success())
}
