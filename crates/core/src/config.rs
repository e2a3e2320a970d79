use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub status_store: StatusStoreConfig,
    pub redis: RedisConfig,
    pub smtp: SmtpConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            status_store: StatusStoreConfig::from_env(),
            redis: RedisConfig::from_env(),
            smtp: SmtpConfig::from_env(),
            report: ReportConfig::from_env(),
        }
    }

    /// Reject configurations the report pipeline cannot run with.
    ///
    /// Interval and recipient problems surface here, at startup — never
    /// inside a tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status_store.host.is_empty() {
            return Err(ConfigError::Missing("STATUS_STORE_HOST"));
        }
        if self.redis.url.is_empty() {
            return Err(ConfigError::Missing("REDIS_URL"));
        }
        if self.smtp.username.is_empty() {
            return Err(ConfigError::Missing("MAIL_USERNAME"));
        }
        if self.report.email_to.is_empty() {
            return Err(ConfigError::Missing("REPORT_EMAIL_TO"));
        }
        if self.report.interval_hours == 0 {
            return Err(ConfigError::Invalid {
                key: "REPORT_INTERVAL_HOURS",
                reason: "interval must be at least one hour".to_string(),
            });
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:       {}:{}", self.server.host, self.server.port);
        tracing::info!("  status store: {}, index={}", self.status_store.base_url(), self.status_store.index);
        tracing::info!("  redis:        {}, key={}", self.redis.url, self.redis.containers_key);
        tracing::info!("  smtp:         {}:{}, from={}", self.smtp.host, self.smtp.port, self.smtp.username);
        tracing::info!(
            "  report:       every {}h to {}",
            self.report.interval_hours,
            self.report.email_to
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 8084),
        }
    }
}

// ── Status store (OpenSearch / Elasticsearch) ─────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusStoreConfig {
    pub host: String,
    pub port: u16,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_ssl: bool,
}

impl StatusStoreConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("STATUS_STORE_HOST", "localhost"),
            port: env_u16("STATUS_STORE_PORT", 9200),
            index: env_or("STATUS_STORE_INDEX", "sms_container"),
            username: env_opt("STATUS_STORE_USERNAME"),
            password: env_opt("STATUS_STORE_PASSWORD"),
            use_ssl: env_or("STATUS_STORE_USE_SSL", "false") == "true",
        }
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

// ── Redis registry ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    /// Key holding the JSON array of known containers.
    pub containers_key: String,
}

impl RedisConfig {
    fn from_env() -> Self {
        Self {
            url: env_or("REDIS_URL", "redis://localhost:6379"),
            containers_key: env_or("REDIS_CONTAINERS_KEY", "containers"),
        }
    }
}

// ── SMTP ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("SMTP_HOST", "smtp.gmail.com"),
            port: env_u16("SMTP_PORT", 587),
            username: env_or("MAIL_USERNAME", ""),
            password: env_or("MAIL_PASSWORD", ""),
        }
    }
}

// ── Report worker ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Tick interval; also the length of each report window.
    pub interval_hours: u64,
    pub email_to: String,
}

impl ReportConfig {
    fn from_env() -> Self {
        Self {
            interval_hours: env_u64("REPORT_INTERVAL_HOURS", 24),
            email_to: env_or("REPORT_EMAIL_TO", ""),
        }
    }
}
