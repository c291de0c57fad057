/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, VALIDATOR_URL, CORS 許可, AWS 連携など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は read-only
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the templated invitation email.
///
/// Only present when `INVITATION_TEMPLATE_NAME` is set; without it invitations
/// are logged instead of mailed.
#[derive(Debug, Clone)]
pub struct InvitationMailConfig {
    pub template_name: String,
    pub sender: String,
    pub source_arn: Option<String>,
    pub landing_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub validator_url: Url,
    pub validator_timeout: Duration,

    pub aws_region: Option<String>,
    pub invitation_mail: Option<InvitationMailConfig>,
    pub dispense_function_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let validator_url = std::env::var("VALIDATOR_URL")
            .map_err(|_| ConfigError::Missing("VALIDATOR_URL"))
            .and_then(|raw| Url::parse(&raw).map_err(|_| ConfigError::Invalid("VALIDATOR_URL")))?;

        let validator_timeout = std::env::var("VALIDATOR_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let aws_region = optional("AWS_REGION");

        let invitation_mail = match optional("INVITATION_TEMPLATE_NAME") {
            Some(template_name) => Some(InvitationMailConfig {
                template_name,
                sender: optional("INVITATION_SENDER")
                    .ok_or(ConfigError::Missing("INVITATION_SENDER"))?,
                source_arn: optional("INVITATION_SOURCE_ARN"),
                landing_url: optional("INVITATION_LANDING_URL")
                    .ok_or(ConfigError::Missing("INVITATION_LANDING_URL"))?,
            }),
            None => None,
        };

        let dispense_function_name = optional("DISPENSE_FUNCTION_NAME")
            .unwrap_or_else(|| "DispenserDispense".to_string());

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            cors_allowed_origins,
            validator_url,
            validator_timeout,
            aws_region,
            invitation_mail,
            dispense_function_name,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
