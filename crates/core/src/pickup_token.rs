//! Short-lived pickup-session tokens issued after OTP verification.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// What a pickup token grants: access to one phone's parcels until expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupTokenInfo {
    pub phone: String,
    pub expires_at: Timestamp,
}

/// Storage for issued pickup tokens.
pub trait PickupTokenStore: Send + Sync {
    fn store(&self, token: &str, info: PickupTokenInfo);
    fn get(&self, token: &str) -> Option<PickupTokenInfo>;
}

/// Process-local token store. Expired entries are purged on write.
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, PickupTokenInfo>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PickupTokenStore for InMemoryTokenStore {
    fn store(&self, token: &str, info: PickupTokenInfo) {
        let mut tokens = self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = chrono::Utc::now();
        tokens.retain(|_, existing| existing.expires_at > now);
        tokens.insert(token.to_string(), info);
    }

    fn get(&self, token: &str) -> Option<PickupTokenInfo> {
        self.tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(token)
            .cloned()
    }
}

/// Issue a random token for `phone`, valid for `ttl` from `now`.
pub fn issue_token(
    store: &dyn PickupTokenStore,
    phone: &str,
    ttl: Duration,
    now: Timestamp,
) -> (String, Timestamp) {
    let token = uuid::Uuid::new_v4().to_string();
    let expires_at = now + ttl;
    store.store(
        &token,
        PickupTokenInfo {
            phone: phone.to_string(),
            expires_at,
        },
    );
    (token, expires_at)
}

/// Resolve a presented token to its phone.
pub fn validate_token(
    store: &dyn PickupTokenStore,
    token: &str,
    now: Timestamp,
) -> Result<PickupTokenInfo, CoreError> {
    if token.trim().is_empty() {
        return Err(CoreError::InvalidToken);
    }
    let info = store.get(token).ok_or(CoreError::InvalidToken)?;
    if now >= info.expires_at {
        return Err(CoreError::TokenExpired);
    }
    Ok(info)
}
