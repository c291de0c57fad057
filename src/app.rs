/*
 * Responsibility
 * - Config読み込み → 依存生成 (Postgres / validator / AWS) → Router 組み立て
 * - Router 全体に掛ける middleware の適用 (recover / security headers / CORS / http)
 * - axum::serve() で起動、ctrl_c で graceful shutdown
 */
use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::middleware::{cors, http, recover, security_headers};
use crate::repos::postgres::PgStore;
use crate::services::notify::{LambdaInvoker, LogMailer, Mailer, SesMailer};
use crate::services::validator::RemoteValidator;
use crate::{api, state::AppState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    let validator = RemoteValidator::new(&config.validator_url, config.validator_timeout)?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }
    let aws = loader.load().await;

    let mailer: Arc<dyn Mailer> = match &config.invitation_mail {
        Some(mail) => Arc::new(SesMailer::new(
            aws_sdk_sesv2::Client::new(&aws),
            mail.clone(),
        )),
        None => {
            tracing::warn!("INVITATION_TEMPLATE_NAME not set; invitations will only be logged");
            Arc::new(LogMailer)
        }
    };
    let functions = Arc::new(LambdaInvoker::new(aws_sdk_lambda::Client::new(&aws)));

    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(validator),
        mailer,
        functions,
        &config.dispense_function_name,
    );

    let app = build_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, env = ?config.app_env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Result<Router> {
    let router = api::router(state)?;
    let router = recover::apply(router);
    let router = security_headers::apply(router);
    let router = cors::apply(router, config.app_env, &config.cors_allowed_origins);
    Ok(http::apply(router))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
