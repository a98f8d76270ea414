/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, APP_ENV, JWT_SECRET など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は immutable。Gateway には factory 経由で注入する
 */
use std::fmt;
use std::net::SocketAddr;

/// Development-only signing secret used when `JWT_SECRET` is unset.
pub const INSECURE_DEV_SECRET: &str = "dev-insecure-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("development").to_ascii_lowercase().as_str() {
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

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // HS256 secret shared with the token issuer
    pub jwt_secret: String,
    pub access_token_leeway_seconds: u64,
    // Trust the payload of a token whose signature does not match
    pub unverified_fallback: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("unverified_fallback", &self.unverified_fallback)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::from_env();

        let jwt_secret = resolve_secret(std::env::var("JWT_SECRET").ok(), app_env)?;

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let unverified_fallback = parse_flag(
            std::env::var("GATE_UNVERIFIED_FALLBACK").ok().as_deref(),
            true,
        )
        .ok_or(ConfigError::Invalid("GATE_UNVERIFIED_FALLBACK"))?;

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            access_token_leeway_seconds,
            unverified_fallback,
        })
    }
}

/// Production must be given a secret. Development falls back to `INSECURE_DEV_SECRET`.
fn resolve_secret(value: Option<String>, app_env: AppEnv) -> Result<String, ConfigError> {
    match value {
        Some(secret) if secret.trim().is_empty() => Err(ConfigError::Invalid("JWT_SECRET")),
        Some(secret) => Ok(secret),
        None if app_env.is_production() => Err(ConfigError::Missing("JWT_SECRET")),
        None => {
            tracing::warn!("JWT_SECRET is not set; using the insecure development secret");
            Ok(INSECURE_DEV_SECRET.to_string())
        }
    }
}

/// Unset → 3000. Anything that is not a port number fails start-up.
fn parse_port(value: Option<&str>) -> Result<u16, ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(3000),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT")),
    }
}

fn parse_flag(value: Option<&str>, default: bool) -> Option<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Some(default),
        Some(v) => match v.as_str() {
            "" => Some(default),
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
    }
}
