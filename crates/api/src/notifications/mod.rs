//! OTP delivery.
//!
//! Delivery is fire-and-forget from the caller's point of view: a failed
//! send is logged and never fails the OTP request.

pub mod webhook;

use async_trait::async_trait;
use locker_core::phone::mask_phone;

pub use webhook::WebhookNotifier;

/// Error type for OTP delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Sends a plaintext OTP code to its recipient.
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    async fn send_otp(&self, phone: &str, code: &str) -> Result<(), NotifyError>;
}

/// Notifier used when no webhook is configured. Records the attempt without
/// the code.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn send_otp(&self, phone: &str, _code: &str) -> Result<(), NotifyError> {
        tracing::info!(
            phone = %mask_phone(phone),
            "No OTP webhook configured, notification not delivered"
        );
        Ok(())
    }
}
