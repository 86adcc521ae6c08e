//! Gateway configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! `from_env` only reads the process environment; all parsing and the
//! fail-closed production rules live in `from_parts` so tests never race on
//! env vars. In production posture the backend origin and the service key
//! are mandatory — the process must not start half-configured.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MAX_BODY_MB: usize = 50;
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8000";

/// Deployment posture. Development relaxes the required-variable rules and
/// includes error detail in synthetic responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub env: AppEnv,
    /// Backend origin URL, no trailing slash.
    pub backend_origin: String,
    /// Shared service credential injected into every forwarded request.
    /// Empty only in development.
    pub service_key: String,
    pub port: u16,
    /// Upper bound on proxied request bodies, in bytes.
    pub max_body_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown APP_ENV: {0}")]
    UnknownEnv(String),
    #[error("{0} is required when APP_ENV=production")]
    MissingRequired(&'static str),
    #[error("invalid {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl GatewayConfig {
    /// Build typed gateway config from environment variables.
    ///
    /// - `APP_ENV`: `development` (default) or `production`
    /// - `BACKEND_ORIGIN`: backend base URL (required in production)
    /// - `SERVICE_API_KEY`: shared service credential (required in production)
    /// - `PORT`: listen port, default 4000
    /// - `MAX_BODY_MB`: proxied body cap in MiB, default 50
    ///
    /// # Errors
    ///
    /// Returns an error when a value fails to parse or a production-required
    /// variable is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var("APP_ENV").ok().as_deref(),
            std::env::var("BACKEND_ORIGIN").ok().as_deref(),
            std::env::var("SERVICE_API_KEY").ok().as_deref(),
            std::env::var("PORT").ok().as_deref(),
            std::env::var("MAX_BODY_MB").ok().as_deref(),
        )
    }

    /// Pure parsing core behind [`GatewayConfig::from_env`].
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_parts(
        env: Option<&str>,
        origin: Option<&str>,
        service_key: Option<&str>,
        port: Option<&str>,
        max_body_mb: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let env = parse_env(env)?;

        let backend_origin = match origin.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.trim_end_matches('/').to_owned(),
            None if env == AppEnv::Production => {
                return Err(ConfigError::MissingRequired("BACKEND_ORIGIN"));
            }
            None => DEFAULT_BACKEND_ORIGIN.to_owned(),
        };

        let service_key = match service_key.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_owned(),
            None if env == AppEnv::Production => {
                return Err(ConfigError::MissingRequired("SERVICE_API_KEY"));
            }
            None => String::new(),
        };

        let port = parse_number("PORT", port, DEFAULT_PORT)?;
        let max_body_mb = parse_number("MAX_BODY_MB", max_body_mb, DEFAULT_MAX_BODY_MB)?;

        Ok(Self { env, backend_origin, service_key, port, max_body_bytes: max_body_mb * 1024 * 1024 })
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.env == AppEnv::Production
    }
}

fn parse_env(raw: Option<&str>) -> Result<AppEnv, ConfigError> {
    match raw.unwrap_or("development") {
        "development" | "dev" => Ok(AppEnv::Development),
        "production" | "prod" => Ok(AppEnv::Production),
        other => Err(ConfigError::UnknownEnv(other.to_owned())),
    }
}

fn parse_number<N: std::str::FromStr>(
    key: &'static str,
    raw: Option<&str>,
    default: N,
) -> Result<N, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .parse::<N>()
            .map_err(|_| ConfigError::InvalidValue { key, value: v.to_owned() }),
    }
}
