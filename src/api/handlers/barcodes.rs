/*
 * Responsibility
 * - explicit: barcode を code で引いて body を適用する
 */
use axum::{Json, extract::State};
use serde_json::Value;

use crate::api::extractors::{JsonBody, Params};
use crate::api::handlers::{changes, same_id};
use crate::error::AppError;
use crate::repos::Filter;
use crate::repos::entities::Barcode;
use crate::state::AppState;

pub async fn update_by_code(
    State(state): State<AppState>,
    Params(code): Params<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Barcode>, AppError> {
    let barcodes = state.repo::<Barcode>();
    let barcode = barcodes.find_one(Filter::new().eq("code", &code)).await?;

    let changes = changes(body)?;
    same_id(&changes, barcode.id, "barcode")?;

    Ok(Json(barcodes.patch(barcode.id, changes).await?))
}
