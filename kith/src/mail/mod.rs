//! Verification-mail delivery
//!
//! Mail is an external collaborator: registration and re-verification
//! hand a recipient, a display name and an activation URL to a
//! [`Mailer`], and delivery failures never fail the request that
//! triggered them.

mod relay;

use async_trait::async_trait;
use tracing::debug;

pub use relay::{HttpMailer, RetryPolicy};

/// Contract for verification-mail delivery
#[async_trait]
pub trait Mailer: Send + Sync + 'static + std::fmt::Debug {
    /// Deliver a verification email carrying the activation URL
    async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        url: &str,
    ) -> Result<(), String>;
}

/// Mailer that only logs; used in development and tests
#[derive(Debug, Clone, Default)]
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        url: &str,
    ) -> Result<(), String> {
        debug!(to, name, url, "verification email suppressed (null mailer)");
        Ok(())
    }
}
