/*
 * Responsibility
 * - implicit: account の invitation 参照 / 一覧 / 作成 (メール送信) / 削除
 * - 受諾: caller を招待元 account へ移し、旧 account 側のデータを退役させる
 *   - owner: 旧 account の全 user を移動し、旧 account 自体も退役
 *   - member: 自分だけを移動
 */
use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::api::dto::invitations::CreateInvitationRequest;
use crate::api::extractors::{AuthContextExtractor, JsonBody, Paginated, Pagination, Params};
use crate::api::handlers::{owned, retire, success};
use crate::error::AppError;
use crate::repos::entities::{Account, Invitation, Regimen, Reminder, Usage, User};
use crate::repos::Filter;
use crate::services::notify::InvitationEmail;
use crate::state::AppState;

const INVITATION_TTL_HOURS: i64 = 48;

pub async fn show(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(invitation_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invitation = owned(
        &state.repo::<Invitation>(),
        invitation_id,
        "account_id",
        ctx.require_account()?,
    )
    .await?;

    Ok(Json(ctx.visible(&invitation)?))
}

pub async fn list(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    pagination: Pagination,
) -> Result<Json<Paginated<Value>>, AppError> {
    let invitations = state
        .repo::<Invitation>()
        .find(
            Filter::new().eq("account_id", ctx.require_account()?),
            Some(pagination.page()),
        )
        .await?;

    Ok(Json(pagination.wrap(ctx.visible_all(&invitations)?)))
}

/// Creates or refreshes the invitation for `(account, email)` and mails the code.
pub async fn create(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    JsonBody(req): JsonBody<CreateInvitationRequest>,
) -> Result<Json<Value>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let account_id = ctx.require_account()?;
    let account = state.repo::<Account>().get(account_id).await?;
    let invitations = state.repo::<Invitation>();
    let email = req.normalized_email();

    let mut invitation = Invitation {
        account_id,
        email: email.clone(),
        code: Uuid::new_v4().simple().to_string(),
        expires_at: Utc::now() + Duration::hours(INVITATION_TTL_HOURS),
        meta: req.meta,
        ..Default::default()
    };

    let existing = invitations
        .find_optional(
            Filter::new()
                .eq("account_id", account_id)
                .eq("email", &email),
        )
        .await?;

    let invitation = match existing {
        Some(existing) => {
            invitation.id = existing.id;
            invitation.created_at = existing.created_at;
            invitations.update(&invitation).await?
        }
        None => invitations.create(&invitation).await?,
    };

    state
        .mailer
        .send_invitation(&InvitationEmail {
            recipient: invitation.email.clone(),
            account_name: account.name,
            code: invitation.code.clone(),
        })
        .await?;

    tracing::info!(invitation = %invitation.id, account = %account_id, "invitation sent");
    Ok(Json(ctx.visible(&invitation)?))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(invitation_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invitations = state.repo::<Invitation>();
    owned(&invitations, invitation_id, "account_id", ctx.require_account()?).await?;
    invitations.delete(invitation_id).await?;

    Ok(success())
}

pub async fn accept(
    State(state): State<AppState>,
    AuthContextExtractor(ctx): AuthContextExtractor,
    Params(invitation_id): Params<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user_id = ctx.require_user()?;
    let old_account = ctx.require_account()?;
    let invitations = state.repo::<Invitation>();

    let invitation = invitations.get(invitation_id).await?;
    let caller = state.repo::<User>().get(user_id).await?;

    if !caller.email.eq_ignore_ascii_case(&invitation.email) || invitation.is_expired(Utc::now()) {
        return Err(AppError::bad_request("user cannot accept this invitation"));
    }

    if old_account != invitation.account_id {
        let cause = json!({ "delete_cause": format!("user {user_id} accepted invitation") });

        let movers = if ctx.owner {
            state
                .repo::<User>()
                .find(Filter::new().eq("account_id", old_account), None)
                .await?
        } else {
            vec![caller]
        };

        for user in &movers {
            move_user(&state, user.id, invitation.account_id).await?;
            retire_user_data(&state, user.id, &cause).await?;
        }

        if ctx.owner {
            retire(&state.repo::<Account>(), old_account, &cause).await?;
        }

        tracing::info!(
            user = %user_id,
            from = %old_account,
            to = %invitation.account_id,
            moved = movers.len(),
            "invitation accepted"
        );
    }

    invitations.delete(invitation.id).await?;
    Ok(success())
}

async fn move_user(state: &AppState, user_id: Uuid, account_id: Uuid) -> Result<(), AppError> {
    let mut changes = Map::new();
    changes.insert("account_id".into(), json!(account_id));
    state.repo::<User>().patch(user_id, changes).await?;
    Ok(())
}

/// Retires the user's regimens with their usages and reminders.
async fn retire_user_data(state: &AppState, user_id: Uuid, cause: &Value) -> Result<(), AppError> {
    let regimens = state.repo::<Regimen>();
    let usages = state.repo::<Usage>();
    let reminders = state.repo::<Reminder>();

    for regimen in regimens
        .find(Filter::new().eq("user_id", user_id), None)
        .await?
    {
        for reminder in reminders
            .find(Filter::new().eq("regimen_id", regimen.id), None)
            .await?
        {
            retire(&reminders, reminder.id, cause).await?;
        }
        for usage in usages
            .find(Filter::new().eq("regimen_id", regimen.id), None)
            .await?
        {
            retire(&usages, usage.id, cause).await?;
        }
        retire(&regimens, regimen.id, cause).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedValidator, TestApp, request, scoped_token};
    use axum::http::{Method, StatusCode};

    struct Household {
        old_account: Uuid,
        owner: User,
        member: User,
        regimen: Regimen,
    }

    async fn household(app: &TestApp) -> Household {
        let old_account = app
            .state
            .repo::<Account>()
            .create(&Account {
                name: "Old Home".into(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id;
        let users = app.state.repo::<User>();
        let owner = users
            .create(&User {
                account_id: Some(old_account),
                email: "Owner@Example.com".into(),
                owner: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let member = users
            .create(&User {
                account_id: Some(old_account),
                email: "member@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let regimen = app
            .state
            .repo::<Regimen>()
            .create(&Regimen {
                account_id: old_account,
                user_id: Some(member.id),
                ..Default::default()
            })
            .await
            .unwrap();

        Household {
            old_account,
            owner,
            member,
            regimen,
        }
    }

    async fn invite(app: &TestApp, email: &str) -> Invitation {
        let account_id = app
            .state
            .repo::<Account>()
            .create(&Account {
                name: "New Home".into(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id;
        app.state
            .repo::<Invitation>()
            .create(&Invitation {
                account_id,
                email: email.into(),
                code: "abc".into(),
                expires_at: Utc::now() + Duration::hours(1),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_lowercases_upserts_and_mails_the_code() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let account = app
            .state
            .repo::<Account>()
            .create(&Account {
                name: "Home".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let token = scoped_token(Uuid::new_v4(), account.id, true, &["account.*"], &["*"]);

        let post = || {
            request(
                Method::POST,
                "/invitation",
                Some(&token),
                Some(json!({ "email": " Friend@Example.COM " })),
            )
        };
        let (status, first) = app.send(post()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["email"], "friend@example.com");
        assert_eq!(first["code"].as_str().unwrap().len(), 32);

        let (_, second) = app.send(post()).await;
        assert_eq!(second["id"], first["id"]);
        assert_ne!(second["code"], first["code"]);

        let sent = app.mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].recipient, "friend@example.com");
        assert_eq!(sent[1].account_name, "Home");
        assert_eq!(Value::String(sent[1].code.clone()), second["code"]);
    }

    #[tokio::test]
    async fn create_rejects_a_blank_email() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let token = scoped_token(Uuid::new_v4(), Uuid::new_v4(), true, &["account.*"], &["*"]);

        let (status, body) = app
            .send(request(
                Method::POST,
                "/invitation",
                Some(&token),
                Some(json!({ "email": "" })),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "email is required" }));
        assert!(app.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn owners_bring_the_whole_household() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let home = household(&app).await;
        let invitation = invite(&app, "owner@example.com").await;
        let token = scoped_token(home.owner.id, home.old_account, true, &["account.*"], &[]);

        let (status, body) = app
            .send(request(
                Method::GET,
                &format!("/invitation/{}/accept", invitation.id),
                Some(&token),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success" }));

        let users = app.state.repo::<User>();
        for id in [home.owner.id, home.member.id] {
            assert_eq!(users.get(id).await.unwrap().account_id, Some(invitation.account_id));
        }
        assert!(app.state.repo::<Account>().get(home.old_account).await.is_err());
        assert!(app.state.repo::<Regimen>().get(home.regimen.id).await.is_err());
        let retired = app
            .store
            .rows("regimens")
            .into_iter()
            .find(|row| row["id"] == json!(home.regimen.id))
            .unwrap();
        assert_eq!(
            retired["meta"],
            json!({ "delete_cause": format!("user {} accepted invitation", home.owner.id) })
        );
        assert!(app.state.repo::<Invitation>().get(invitation.id).await.is_err());
    }

    #[tokio::test]
    async fn members_move_alone() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let home = household(&app).await;
        let invitation = invite(&app, "member@example.com").await;
        let token = scoped_token(home.member.id, home.old_account, false, &["account.*"], &[]);

        let (status, _) = app
            .send(request(
                Method::GET,
                &format!("/invitation/{}/accept", invitation.id),
                Some(&token),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);

        let users = app.state.repo::<User>();
        assert_eq!(
            users.get(home.member.id).await.unwrap().account_id,
            Some(invitation.account_id)
        );
        assert_eq!(
            users.get(home.owner.id).await.unwrap().account_id,
            Some(home.old_account)
        );
        assert!(app.state.repo::<Account>().get(home.old_account).await.is_ok());
        assert!(app.state.repo::<Regimen>().get(home.regimen.id).await.is_err());
    }

    #[tokio::test]
    async fn someone_elses_invitation_cannot_be_accepted() {
        let app = TestApp::new(ScriptedValidator::allow_all());
        let home = household(&app).await;
        let invitation = invite(&app, "stranger@example.com").await;
        let token = scoped_token(home.member.id, home.old_account, false, &["account.*"], &[]);

        let (status, body) = app
            .send(request(
                Method::GET,
                &format!("/invitation/{}/accept", invitation.id),
                Some(&token),
                None,
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "user cannot accept this invitation" }));
        assert!(app.state.repo::<Invitation>().get(invitation.id).await.is_ok());
    }
}
