//! Write-back of Stripe customer IDs onto local records.

use async_trait::async_trait;

use betfund_core::StripeCustomerId;

/// Error reported by a [`CustomerLinkStore`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct LinkError(String);

impl LinkError {
    /// Create an error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Durable mapping from local records to Stripe customers.
///
/// The application implements this against its own storage, typically by
/// updating the user row's `stripe_id` column.
#[async_trait]
pub trait CustomerLinkStore: Send + Sync {
    /// Record that the local customer with `email` is `customer_id` on Stripe.
    async fn link(&self, email: &str, customer_id: &StripeCustomerId) -> Result<(), LinkError>;

    /// Forget the mapping after the Stripe customer was deleted.
    async fn unlink(&self, email: &str, customer_id: &StripeCustomerId) -> Result<(), LinkError>;
}

/// Link store that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLinkStore;

#[async_trait]
impl CustomerLinkStore for NoopLinkStore {
    async fn link(&self, email: &str, customer_id: &StripeCustomerId) -> Result<(), LinkError> {
        tracing::debug!(email = %email, customer_id = %customer_id, "No link store configured, Stripe ID not persisted");
        Ok(())
    }

    async fn unlink(&self, _email: &str, _customer_id: &StripeCustomerId) -> Result<(), LinkError> {
        Ok(())
    }
}
