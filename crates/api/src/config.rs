use chrono::Duration;

use crate::auth::jwt::JwtConfig;
use locker_core::otp::{
    DEFAULT_OTP_REQUEST_WINDOW_SECS, DEFAULT_OTP_TTL_SECS, DEFAULT_PICKUP_TOKEN_TTL_SECS,
};

/// Default pickup window for deposited parcels.
pub const DEFAULT_PARCEL_PICKUP_WINDOW_HOURS: i64 = 72;

/// Default interval between background expiry sweeps.
pub const DEFAULT_EXPIRY_SWEEP_INTERVAL_SECS: u64 = 60;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// OTP lifetime in seconds (default: `300`).
    pub otp_ttl_secs: i64,
    /// Minimum seconds between OTP requests for one phone (default: `30`).
    pub otp_request_window_secs: i64,
    /// Pickup-session token lifetime in seconds (default: `900`).
    pub pickup_token_ttl_secs: i64,
    /// Hours a deposited parcel waits before it can expire (default: `72`).
    pub parcel_pickup_window_hours: i64,
    /// Seconds between background expiry sweeps (default: `60`).
    pub expiry_sweep_interval_secs: u64,
    /// Webhook receiving OTP notifications. Unset means log-only delivery.
    pub otp_webhook_url: Option<String>,
    /// Staff access-token settings, see [`JwtConfig::from_env`].
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `OTP_TTL_SECS`               | `300`                   |
    /// | `OTP_REQUEST_WINDOW_SECS`    | `30`                    |
    /// | `PICKUP_TOKEN_TTL_SECS`      | `900`                   |
    /// | `PARCEL_PICKUP_WINDOW_HOURS` | `72`                    |
    /// | `EXPIRY_SWEEP_INTERVAL_SECS` | `60`                    |
    /// | `OTP_WEBHOOK_URL`            | unset                   |
    ///
    /// # Panics
    ///
    /// Panics on an unparseable number or a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let otp_webhook_url = std::env::var("OTP_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            otp_ttl_secs: env_or("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS),
            otp_request_window_secs: env_or("OTP_REQUEST_WINDOW_SECS", DEFAULT_OTP_REQUEST_WINDOW_SECS),
            pickup_token_ttl_secs: env_or("PICKUP_TOKEN_TTL_SECS", DEFAULT_PICKUP_TOKEN_TTL_SECS),
            parcel_pickup_window_hours: env_or(
                "PARCEL_PICKUP_WINDOW_HOURS",
                DEFAULT_PARCEL_PICKUP_WINDOW_HOURS,
            ),
            expiry_sweep_interval_secs: env_or(
                "EXPIRY_SWEEP_INTERVAL_SECS",
                DEFAULT_EXPIRY_SWEEP_INTERVAL_SECS,
            ),
            otp_webhook_url,
            jwt: JwtConfig::from_env(),
        }
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::seconds(self.otp_ttl_secs)
    }

    pub fn otp_request_window(&self) -> Duration {
        Duration::seconds(self.otp_request_window_secs)
    }

    pub fn pickup_token_ttl(&self) -> Duration {
        Duration::seconds(self.pickup_token_ttl_secs)
    }

    pub fn parcel_pickup_window(&self) -> Duration {
        Duration::hours(self.parcel_pickup_window_hours)
    }
}

/// Parse an env var, falling back to `default` when unset.
///
/// Panics on an unparseable value so misconfiguration fails at startup.
fn env_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid number: {e}")),
        Err(_) => default,
    }
}
