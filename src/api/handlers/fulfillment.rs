/*
 * Responsibility
 * - voice: Google Smart Home / Alexa Smart Home の fulfillment webhook
 * - 「dispense」は caller の account に接続中の最初の dispenser を dispense function に渡す
 *
 * Notes
 * - Google の EXECUTE は応答を待たせないため background task で dispense する (失敗は log のみ)
 * - Alexa の TurnOn は dispense の完了を待って応答する
 * - response は provider 既定の envelope で、field filter は通さない
 */
use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::dto::lambda::DispenseCommand;
use crate::api::dto::voice::{
    AlexaRequest, GOOGLE_EXECUTE, GOOGLE_SYNC, GoogleRequest, alexa_discovery, alexa_turned_on,
    google_devices, google_response,
};
use crate::api::extractors::{AuthContextExtractor, JsonBody};
use crate::error::AppError;
use crate::repos::entities::User;
use crate::repos::{Page, queries};
use crate::state::AppState;

/// Asks the dispense function to dispense from the user's first connected dispenser.
async fn dispense(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    let user = state.repo::<User>().get(user_id).await?;
    let account_id = user
        .account_id
        .ok_or_else(|| AppError::not_found("account"))?;

    let dispenser = queries::account_dispensers(&state.store, account_id, Some(Page::first()))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found("dispenser"))?;

    let command = serde_json::to_value(DispenseCommand::new(account_id, &dispenser))?;
    state
        .functions
        .invoke(&state.dispense_function, &command)
        .await?;

    tracing::info!(user = %user_id, dispenser = %dispenser.id, "dispense requested");
    Ok(())
}

pub async fn google(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    JsonBody(request): JsonBody<GoogleRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = ctx.require_user()?;

    let payload = match request.intent() {
        Some(GOOGLE_SYNC) => google_devices(user_id),
        Some(GOOGLE_EXECUTE) => {
            let state = state.clone();
            tokio::spawn(async move {
                if let Err(err) = dispense(&state, user_id).await {
                    tracing::error!(user = %user_id, error = %err, "google dispense failed");
                }
            });
            json!({})
        }
        _ => json!({}),
    };

    Ok(Json(google_response(&request.request_id, payload)))
}

pub async fn alexa(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    JsonBody(request): JsonBody<AlexaRequest>,
) -> Result<Json<Value>, AppError> {
    let header = &request.directive.header;

    let response = match header.name.as_str() {
        "Discover" => alexa_discovery(&header.message_id),
        "TurnOn" => {
            dispense(&state, ctx.require_user()?).await?;
            alexa_turned_on(&header.message_id, Utc::now())
        }
        _ => json!({}),
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::entities::{Connection, Dispenser};
    use crate::test_support::{ScriptedValidator, TestApp, mint, request};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};

    async fn linked_user(app: &TestApp) -> (User, Dispenser) {
        let account_id = Uuid::new_v4();
        let user = app
            .state
            .repo::<User>()
            .create(&User {
                account_id: Some(account_id),
                ..Default::default()
            })
            .await
            .unwrap();
        let dispenser = app
            .state
            .repo::<Dispenser>()
            .create(&Dispenser {
                serial: "SN-7".into(),
                name: "Kitchen".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        app.state
            .repo::<Connection>()
            .create(&Connection {
                account_id,
                dispenser_id: dispenser.id,
                ..Default::default()
            })
            .await
            .unwrap();
        (user, dispenser)
    }

    #[tokio::test]
    async fn google_sync_lists_the_dispenser_for_the_caller() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let user_id = Uuid::new_v4();
        let token = mint(&json!({ "user_id": user_id }));

        let (status, body) = app
            .send(request(
                Method::POST,
                "/google/fulfillment",
                Some(&token),
                Some(json!({ "requestId": "r-1", "inputs": [{ "intent": GOOGLE_SYNC }] })),
            ))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requestId"], "r-1");
        assert_eq!(body["payload"]["agentUserId"], json!(user_id));
        assert_eq!(body["payload"]["devices"][0]["id"], "tespo dispenser");
    }

    #[tokio::test]
    async fn google_execute_dispenses_in_the_background() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let (user, _) = linked_user(&app).await;
        let token = mint(&json!({ "user_id": user.id }));

        let (status, body) = app
            .send(request(
                Method::POST,
                "/google/fulfillment",
                Some(&token),
                Some(json!({ "requestId": "r-2", "inputs": [{ "intent": GOOGLE_EXECUTE }] })),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "requestId": "r-2", "payload": {} }));

        let (function, payload) = app.next_invocation().await.unwrap();
        assert_eq!(function, TestApp::DISPENSE_FUNCTION);
        assert_eq!(
            payload,
            json!({
                "customer": { "id": user.account_id },
                "dispenser": { "serial": "SN-7", "name": "Kitchen" },
            })
        );
    }

    #[tokio::test]
    async fn alexa_turn_on_reads_the_token_from_the_directive() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let (user, _) = linked_user(&app).await;
        let token = mint(&json!({ "user_id": user.id }));
        let directive = json!({
            "directive": {
                "header": {
                    "namespace": "Alexa.PowerController",
                    "name": "TurnOn",
                    "messageId": "m-1",
                    "payloadVersion": "3",
                },
                "endpoint": { "scope": { "type": "BearerToken", "token": token } },
                "payload": {},
            }
        });
        let req = Request::builder()
            .method(Method::POST)
            .uri("/alexa/fulfillment")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(directive.to_string()))
            .unwrap();

        let (status, body) = app.send(req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event"]["header"]["messageId"], "m-1");
        assert_eq!(body["context"]["properties"][0]["value"], "ON");
        let (function, _) = app.next_invocation().await.unwrap();
        assert_eq!(function, TestApp::DISPENSE_FUNCTION);
    }

    #[tokio::test]
    async fn alexa_turn_on_without_a_dispenser_is_404() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let user = app
            .state
            .repo::<User>()
            .create(&User {
                account_id: Some(Uuid::new_v4()),
                ..Default::default()
            })
            .await
            .unwrap();
        let token = mint(&json!({ "user_id": user.id }));

        let (status, body) = app
            .send(request(
                Method::POST,
                "/alexa/fulfillment",
                Some(&token),
                Some(json!({ "directive": { "header": { "name": "TurnOn", "messageId": "m-2" } } })),
            ))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "dispenser not found" }));
    }
}
