/*
 * Responsibility
 * - explicit route 用の汎用 CRUD handler (Entity ごとに monomorphize)
 * - list は pagination 付き、update は body の top-level field を merge
 * - response は filter しない (explicit caller は fully privileged)
 */
use axum::{Json, extract::State};
use serde_json::Value;
use uuid::Uuid;

use crate::api::extractors::{JsonBody, Paginated, Pagination, Params};
use crate::api::handlers::{changes, same_id, success};
use crate::error::AppError;
use crate::repos::entities::Entity;
use crate::state::AppState;

pub async fn list<E: Entity>(
    State(state): State<AppState>,
    pagination: Pagination,
) -> Result<Json<Paginated<E>>, AppError> {
    let rows = state.repo::<E>().list(Some(pagination.page())).await?;
    Ok(Json(pagination.wrap(rows)))
}

pub async fn show<E: Entity>(
    State(state): State<AppState>,
    Params(id): Params<Uuid>,
) -> Result<Json<E>, AppError> {
    Ok(Json(state.repo::<E>().get(id).await?))
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    JsonBody(entity): JsonBody<E>,
) -> Result<Json<E>, AppError> {
    Ok(Json(state.repo::<E>().create(&entity).await?))
}

pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Params(id): Params<Uuid>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<E>, AppError> {
    let changes = changes(body)?;
    same_id(&changes, id, E::SCOPE)?;

    Ok(Json(state.repo::<E>().patch(id, changes).await?))
}

pub async fn remove<E: Entity>(
    State(state): State<AppState>,
    Params(id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.repo::<E>().delete(id).await?;
    Ok(success())
}

#[cfg(test)]
mod tests {
    use crate::repos::entities::Pod;
    use crate::test_support::{ScriptedValidator, TestApp, request};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn pods_round_trip_through_the_explicit_routes() {
        let app = TestApp::new(ScriptedValidator::allow_all());

        let (status, created) = app
            .send(request(
                Method::POST,
                "/pods",
                Some("admin"),
                Some(json!({ "name": "Vitamin D", "servings": 30, "meta": { "batch": 4 } })),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["meta"], json!({ "batch": 4 }));
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = app
            .send(request(
                Method::PUT,
                &format!("/pods/{id}"),
                Some("admin"),
                Some(json!({ "id": id, "servings": 60 })),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["servings"], 60);
        assert_eq!(updated["name"], "Vitamin D");

        let (status, body) = app
            .send(request(Method::DELETE, &format!("/pods/{id}"), Some("admin"), None))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success" }));

        let (status, body) = app
            .send(request(Method::GET, &format!("/pods/{id}"), Some("admin"), None))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "pod not found" }));
    }

    #[tokio::test]
    async fn update_refuses_to_move_a_record_to_another_id() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let pod = app.state.repo::<Pod>().create(&Pod::default()).await.unwrap();

        let (status, body) = app
            .send(request(
                Method::PUT,
                &format!("/pods/{}", pod.id),
                Some("admin"),
                Some(json!({ "id": Uuid::new_v4() })),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "cannot update pod id" }));
    }

    #[tokio::test]
    async fn lists_are_paginated() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let pods = app.state.repo::<Pod>();
        for _ in 0..3 {
            pods.create(&Pod::default()).await.unwrap();
        }

        let (status, body) = app
            .send(request(Method::GET, "/pods?limit=2&page=0", Some("admin"), None))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["next"], "/pods?limit=2&page=1");
        assert_eq!(body["pagination"]["previous"], json!(null));
    }

    #[tokio::test]
    async fn malformed_ids_are_bad_requests() {
        let app = TestApp::new(ScriptedValidator::allow_all());

        let (status, body) = app
            .send(request(Method::GET, "/pods/not-a-uuid", Some("admin"), None))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
