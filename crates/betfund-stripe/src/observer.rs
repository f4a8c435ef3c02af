//! Outcome reporting for customer synchronization.
//!
//! [`CustomerSync`](crate::CustomerSync) reports what it did through a
//! [`SyncObserver`] instead of configuring logging itself. The default
//! [`TracingObserver`] turns each event into a `tracing` event; the host
//! application decides where those go.

use crate::types::Customer;

/// Something the sync facade did or found.
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    /// `create` skipped because the customer already exists.
    AlreadyExists {
        /// Email of the local record.
        email: &'a str,
        /// Stripe ID the record is linked to, if known.
        customer_id: Option<&'a str>,
    },
    /// A Stripe customer was created.
    Created {
        /// Email of the local record.
        email: &'a str,
        /// New Stripe ID.
        customer_id: &'a str,
    },
    /// Stripe confirmed a deletion.
    Deleted {
        /// Deleted Stripe ID.
        customer_id: &'a str,
    },
    /// `delete` was called for a customer that does not exist.
    DeleteOfMissing {
        /// Email of the local record.
        email: &'a str,
        /// Stripe ID the record is linked to, if any.
        customer_id: Option<&'a str>,
    },
    /// The existence lookup found the customer.
    RetrieveSucceeded {
        /// Retrieved customer.
        customer: &'a Customer,
    },
    /// The existence lookup was answered with not-found.
    RetrieveNotFound {
        /// Looked-up Stripe ID.
        customer_id: &'a str,
    },
}

/// Receives [`SyncEvent`]s.
pub trait SyncObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &SyncEvent<'_>);
}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn on_event(&self, event: &SyncEvent<'_>) {
        match *event {
            SyncEvent::AlreadyExists { email, customer_id } => {
                tracing::info!(email = %email, customer_id = ?customer_id, "Stripe customer already exists");
            }
            SyncEvent::Created { email, customer_id } => {
                tracing::info!(email = %email, customer_id = %customer_id, "Stripe customer created");
            }
            SyncEvent::Deleted { customer_id } => {
                tracing::info!(customer_id = %customer_id, "Stripe customer deleted");
            }
            SyncEvent::DeleteOfMissing { email, customer_id } => {
                tracing::error!(email = %email, customer_id = ?customer_id, "Stripe customer does not exist");
            }
            SyncEvent::RetrieveSucceeded { customer } => {
                let body = serde_json::to_string_pretty(customer).unwrap_or_default();
                tracing::info!(customer_id = %customer.id, customer = %body, "Stripe customer retrieved");
            }
            SyncEvent::RetrieveNotFound { customer_id } => {
                tracing::error!(customer_id = %customer_id, "Stripe customer does not exist");
            }
        }
    }
}
