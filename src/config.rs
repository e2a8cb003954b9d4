/*
 * Responsibility
 * - Load settings from the environment (port, pre-auth header names, admin identities, HTTP limits)
 * - Validate values up front (fail start-up instead of failing per request)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;

pub const DEFAULT_PRINCIPAL_HEADER: &str = "x-actor-id";
pub const DEFAULT_CREDENTIALS_HEADER: &str = "x-grantor-id";
pub const DEFAULT_ADMIN_PRINCIPAL: &str = "joe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
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

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Names of the headers an upstream gateway injects after it authenticated the caller.
#[derive(Debug, Clone)]
pub struct PreAuthHeaders {
    pub principal: HeaderName,
    pub credentials: HeaderName,
    /// Reject requests without the principal header at the gate (401) instead of
    /// letting them through unauthenticated.
    pub exception_if_header_missing: bool,
}

impl Default for PreAuthHeaders {
    fn default() -> Self {
        Self {
            principal: HeaderName::from_static(DEFAULT_PRINCIPAL_HEADER),
            credentials: HeaderName::from_static(DEFAULT_CREDENTIALS_HEADER),
            exception_if_header_missing: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub preauth: PreAuthHeaders,
    pub admin_principals: Vec<String>,

    pub http: HttpLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            app_env: AppEnv::Development,
            preauth: PreAuthHeaders::default(),
            admin_principals: vec![DEFAULT_ADMIN_PRINCIPAL.to_string()],
            http: HttpLimits::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup so parsing can be exercised
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let principal = header_name(
            lookup("PREAUTH_PRINCIPAL_HEADER"),
            DEFAULT_PRINCIPAL_HEADER,
            "PREAUTH_PRINCIPAL_HEADER",
        )?;
        let credentials = header_name(
            lookup("PREAUTH_CREDENTIALS_HEADER"),
            DEFAULT_CREDENTIALS_HEADER,
            "PREAUTH_CREDENTIALS_HEADER",
        )?;
        if principal == credentials {
            return Err(ConfigError::Invalid("PREAUTH_CREDENTIALS_HEADER"));
        }

        let exception_if_header_missing = match lookup("PREAUTH_EXCEPTION_IF_HEADER_MISSING") {
            Some(raw) => parse_bool(&raw)
                .ok_or(ConfigError::Invalid("PREAUTH_EXCEPTION_IF_HEADER_MISSING"))?,
            None => false,
        };

        // An empty list would silently demote every caller to USER.
        let admin_principals = match lookup("ADMIN_PRINCIPALS") {
            Some(raw) => {
                let list = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>();
                if list.is_empty() {
                    return Err(ConfigError::Invalid("ADMIN_PRINCIPALS"));
                }
                list
            }
            None => vec![DEFAULT_ADMIN_PRINCIPAL.to_string()],
        };

        let request_timeout_seconds = match lookup("HTTP_REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let body_limit_bytes = match lookup("HTTP_BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            preauth: PreAuthHeaders {
                principal,
                credentials,
                exception_if_header_missing,
            },
            admin_principals,
            http: HttpLimits {
                request_timeout: Duration::from_secs(request_timeout_seconds),
                body_limit_bytes,
            },
        })
    }
}

fn header_name(
    raw: Option<String>,
    default: &'static str,
    key: &'static str,
) -> Result<HeaderName, ConfigError> {
    match raw {
        Some(raw) => {
            HeaderName::from_bytes(raw.trim().as_bytes()).map_err(|_| ConfigError::Invalid(key))
        }
        None => Ok(HeaderName::from_static(default)),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
