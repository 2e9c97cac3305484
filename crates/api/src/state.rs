use std::sync::Arc;

use locker_core::pickup_token::{InMemoryTokenStore, PickupTokenStore};
use locker_core::rate_limit::{RateLimiter, WindowRateLimiter};

use crate::auth::jwt::RevokedTokens;
use crate::config::ServerConfig;
use crate::notifications::{LogNotifier, OtpNotifier, WebhookNotifier};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: locker_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-phone OTP request throttle.
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Issued pickup-session tokens.
    pub token_store: Arc<dyn PickupTokenStore>,
    /// OTP delivery channel.
    pub notifier: Arc<dyn OtpNotifier>,
    /// Access tokens revoked by logout.
    pub revoked_tokens: Arc<RevokedTokens>,
}

impl AppState {
    /// Build state with the process-local rate limiter, token store and
    /// revocation list, and a webhook notifier when `OTP_WEBHOOK_URL` is set.
    pub fn new(pool: locker_db::DbPool, config: ServerConfig) -> Self {
        let notifier: Arc<dyn OtpNotifier> = match &config.otp_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => Arc::new(LogNotifier),
        };
        Self {
            pool,
            rate_limiter: Arc::new(WindowRateLimiter::new(
                config.otp_request_window().to_std().unwrap_or_default(),
            )),
            token_store: Arc::new(InMemoryTokenStore::new()),
            notifier,
            revoked_tokens: Arc::new(RevokedTokens::new()),
            config: Arc::new(config),
        }
    }
}
