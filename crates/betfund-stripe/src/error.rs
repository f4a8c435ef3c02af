//! Customer synchronization errors.

use crate::client::StripeError;
use crate::config::ConfigError;
use crate::link::LinkError;

/// Errors returned by [`CustomerSync`](crate::CustomerSync).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Stripe call failed; the client error is passed through untouched.
    #[error(transparent)]
    Stripe(#[from] StripeError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The local record is not usable for this operation.
    #[error("invalid customer record: {0}")]
    InvalidRecord(String),

    /// No Stripe customer ID is known for the local record.
    #[error("customer has no Stripe ID")]
    MissingProviderId,

    /// Stripe answered with something we cannot use.
    #[error("invalid Stripe response: {0}")]
    InvalidResponse(String),

    /// Writing the Stripe ID back failed.
    #[error("link store error: {0}")]
    Link(#[from] LinkError),
}

impl SyncError {
    /// The underlying Stripe error, if this is one.
    #[must_use]
    pub fn as_stripe(&self) -> Option<&StripeError> {
        match self {
            Self::Stripe(err) => Some(err),
            _ => None,
        }
    }
}
