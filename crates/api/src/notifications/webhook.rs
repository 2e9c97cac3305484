//! Single-attempt webhook delivery of OTP codes.
//!
//! Posts a chat-style `{"content": ...}` JSON body, which Discord and
//! Slack-compatible incoming webhooks accept as-is. There is no retry.

use std::time::Duration;

use async_trait::async_trait;

use super::{NotifyError, OtpNotifier};

/// HTTP request timeout for a delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivers OTP codes to an external webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier with a pre-configured HTTP client.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }
}

/// Message body posted to the webhook.
pub(crate) fn otp_message(phone: &str, code: &str) -> serde_json::Value {
    serde_json::json!({
        "content": format!("OTP for pickup\nPhone: {phone}\nCode: {code}"),
    })
}

#[async_trait]
impl OtpNotifier for WebhookNotifier {
    async fn send_otp(&self, phone: &str, code: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&otp_message(phone, code))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
