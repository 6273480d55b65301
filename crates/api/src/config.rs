use std::path::PathBuf;
use std::time::Duration;

use beacon_core::alert::{DEFAULT_MAX_AGE_MINS, DEFAULT_SWEEP_INTERVAL_SECS};
use beacon_core::upload::DEFAULT_MAX_PHOTO_BYTES;
use beacon_lifecycle::SweeperConfig;

use crate::auth::jwt::JwtConfig;

/// Where uploaded profile photos go and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory photos are written to and served from (default: `uploads`).
    pub dir: PathBuf,
    /// Largest accepted photo in bytes (default: 2 MiB).
    pub max_bytes: usize,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub sweeper: SweeperConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `UPLOAD_MAX_BYTES`     | `2097152`                  |
    /// | `ALERT_MAX_AGE_MINS`   | `40`                       |
    /// | `SWEEP_INTERVAL_SECS`  | `60`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let uploads = UploadConfig {
            dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_PHOTO_BYTES.to_string())
                .parse()
                .expect("UPLOAD_MAX_BYTES must be a valid usize"),
        };

        let max_age_mins: i64 = std::env::var("ALERT_MAX_AGE_MINS")
            .unwrap_or_else(|_| DEFAULT_MAX_AGE_MINS.to_string())
            .parse()
            .expect("ALERT_MAX_AGE_MINS must be a valid i64");
        assert!(max_age_mins > 0, "ALERT_MAX_AGE_MINS must be positive");

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(sweep_interval_secs > 0, "SWEEP_INTERVAL_SECS must be positive");

        let sweeper = SweeperConfig {
            interval: Duration::from_secs(sweep_interval_secs),
            max_age: chrono::Duration::minutes(max_age_mins),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            uploads,
            sweeper,
        }
    }
}
