//! Local customer records.
//!
//! The application owns and persists its user rows. Stripe synchronization
//! only needs a handful of read-only fields from them, exposed through
//! [`CustomerRecord`].

use serde::{Deserialize, Serialize};

use crate::ids::StripeCustomerId;

/// Read-only view of a local customer record.
///
/// Implement this for whatever the application stores users as.
pub trait CustomerRecord {
    /// Email address sent to Stripe on creation.
    fn email_address(&self) -> &str;

    /// Given name.
    fn first_name(&self) -> &str;

    /// Family name.
    fn last_name(&self) -> &str;

    /// Stripe customer ID previously written back onto the record, if any.
    fn provider_id(&self) -> Option<&str>;

    /// Display name sent to Stripe: first and last name joined by one space.
    fn display_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    /// The stored provider ID, with blank values treated as absent.
    fn stored_customer_id(&self) -> Option<StripeCustomerId> {
        self.provider_id()
            .and_then(|id| StripeCustomerId::new(id).ok())
    }
}

/// A plain local customer record.
///
/// Accepts both `stripe_id` and the legacy `stripeId` key when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCustomer {
    /// Email address.
    pub email_address: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Stripe customer ID, once synced.
    #[serde(default, alias = "stripeId", skip_serializing_if = "Option::is_none")]
    pub stripe_id: Option<String>,
}

impl LocalCustomer {
    /// Create a record that has not been synced to Stripe yet.
    #[must_use]
    pub fn new(
        email_address: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email_address: email_address.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            stripe_id: None,
        }
    }

    /// Attach a Stripe customer ID.
    #[must_use]
    pub fn with_stripe_id(mut self, stripe_id: impl Into<String>) -> Self {
        self.stripe_id = Some(stripe_id.into());
        self
    }
}

impl CustomerRecord for LocalCustomer {
    fn email_address(&self) -> &str {
        &self.email_address
    }

    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn provider_id(&self) -> Option<&str> {
        self.stripe_id.as_deref()
    }
}

impl<T: CustomerRecord + ?Sized> CustomerRecord for &T {
    fn email_address(&self) -> &str {
        (**self).email_address()
    }

    fn first_name(&self) -> &str {
        (**self).first_name()
    }

    fn last_name(&self) -> &str {
        (**self).last_name()
    }

    fn provider_id(&self) -> Option<&str> {
        (**self).provider_id()
    }
}
