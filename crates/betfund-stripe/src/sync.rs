//! Keeps a local customer record and its Stripe customer in step.
//!
//! [`CustomerSync`] wraps the Stripe customer endpoints for one local record.
//! `create` and `delete` are guarded by an existence check made immediately
//! before the mutating call. The check is not atomic with the call: two
//! facades for the same record can both pass it, so callers must serialize
//! access per record.

use std::sync::Arc;

use betfund_core::{CustomerRecord, StripeCustomerId};

use crate::client::{StripeClient, StripeError};
use crate::config::StripeConfig;
use crate::error::SyncError;
use crate::link::{CustomerLinkStore, NoopLinkStore};
use crate::observer::{SyncEvent, SyncObserver, TracingObserver};
use crate::types::{Customer, DeletedCustomer, StripeList};

/// How the existence check treats a stored Stripe ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistencePolicy {
    /// Report "missing" whenever an ID is stored. Without an ID the lookup
    /// is answered as not-found locally, so this policy never reports
    /// "exists". Kept for callers that depend on the inverted check, usually
    /// together with [`DeleteGuard::Proceed`].
    Legacy,
    /// Report "missing" without a request when no ID is stored; otherwise
    /// retrieve the stored ID from Stripe.
    #[default]
    VerifyStoredId,
}

/// What `delete` does when the existence check reports "missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteGuard {
    /// Stop and return `None`.
    #[default]
    Abort,
    /// Attempt the deletion anyway.
    Proceed,
}

/// Stripe customer operations for one local record.
pub struct CustomerSync<R> {
    client: StripeClient,
    record: R,
    linked_id: Option<StripeCustomerId>,
    existence: ExistencePolicy,
    delete_guard: DeleteGuard,
    observer: Arc<dyn SyncObserver>,
    links: Arc<dyn CustomerLinkStore>,
}

impl<R: CustomerRecord> CustomerSync<R> {
    /// Create a facade for `record` using `client`.
    #[must_use]
    pub fn new(record: R, client: StripeClient) -> Self {
        Self {
            client,
            record,
            linked_id: None,
            existence: ExistencePolicy::default(),
            delete_guard: DeleteGuard::default(),
            observer: Arc::new(TracingObserver),
            links: Arc::new(NoopLinkStore),
        }
    }

    /// Create a facade whose client is configured from the environment.
    ///
    /// The API key is read once, here.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the client cannot be built.
    pub fn from_env(record: R) -> Result<Self, SyncError> {
        let config = StripeConfig::from_env()?;
        let client = StripeClient::from_config(&config)?;
        Ok(Self::new(record, client))
    }

    /// Report outcomes to `observer` instead of `tracing`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Persist created IDs through `links`.
    #[must_use]
    pub fn with_link_store(mut self, links: Arc<dyn CustomerLinkStore>) -> Self {
        self.links = links;
        self
    }

    /// Select the existence check.
    #[must_use]
    pub fn with_existence_policy(mut self, policy: ExistencePolicy) -> Self {
        self.existence = policy;
        self
    }

    /// Select what `delete` does for a missing customer.
    #[must_use]
    pub fn with_delete_guard(mut self, guard: DeleteGuard) -> Self {
        self.delete_guard = guard;
        self
    }

    /// The local record.
    #[must_use]
    pub fn record(&self) -> &R {
        &self.record
    }

    /// The Stripe ID for the record: the one created through this facade,
    /// else the one stored on the record.
    #[must_use]
    pub fn customer_id(&self) -> Option<StripeCustomerId> {
        self.linked_id
            .clone()
            .or_else(|| self.record.stored_customer_id())
    }

    /// Whether a Stripe ID is known for the record.
    #[must_use]
    pub fn has_stored_identifier(&self) -> bool {
        self.linked_id.is_some() || self.record.stored_customer_id().is_some()
    }

    /// List Stripe customers.
    ///
    /// # Errors
    ///
    /// Returns the client error unchanged.
    pub async fn list(&self, limit: Option<u32>) -> Result<StripeList<Customer>, StripeError> {
        self.client.list_customers(limit).await
    }

    /// Create the Stripe customer unless it already exists.
    ///
    /// Returns `None` when nothing was created. On success the new ID is
    /// written back through the link store; if that write fails the customer
    /// still exists on Stripe and [`customer_id`](Self::customer_id) returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if a Stripe call fails (other than a not-found during
    /// the existence check), the record has no email, or the write-back fails.
    pub async fn create(&mut self) -> Result<Option<Customer>, SyncError> {
        if self.exists().await? {
            let customer_id = self.customer_id();
            self.observer.on_event(&SyncEvent::AlreadyExists {
                email: self.record.email_address(),
                customer_id: customer_id.as_ref().map(StripeCustomerId::as_str),
            });
            return Ok(None);
        }

        let email = self.record.email_address();
        if email.trim().is_empty() {
            return Err(SyncError::InvalidRecord("email_address is required".into()));
        }

        let customer = self
            .client
            .create_customer(email, &self.record.display_name())
            .await?;

        let customer_id = StripeCustomerId::new(customer.id.as_str())
            .map_err(|_| SyncError::InvalidResponse("created customer has no id".into()))?;

        self.linked_id = Some(customer_id.clone());
        self.observer.on_event(&SyncEvent::Created {
            email,
            customer_id: customer_id.as_str(),
        });
        self.links.link(email, &customer_id).await?;

        Ok(Some(customer))
    }

    /// Delete the Stripe customer.
    ///
    /// Returns Stripe's confirmation; check its `deleted` flag. Returns `None`
    /// if the customer is missing and the guard is [`DeleteGuard::Abort`].
    ///
    /// # Errors
    ///
    /// Returns an error if a Stripe call fails (other than a not-found during
    /// the existence check), no Stripe ID is known, or the unlink fails.
    pub async fn delete(&mut self) -> Result<Option<DeletedCustomer>, SyncError> {
        let customer_id = self.customer_id();

        if !self.exists().await? {
            self.observer.on_event(&SyncEvent::DeleteOfMissing {
                email: self.record.email_address(),
                customer_id: customer_id.as_ref().map(StripeCustomerId::as_str),
            });
            if self.delete_guard == DeleteGuard::Abort {
                return Ok(None);
            }
        }

        let customer_id = customer_id.ok_or(SyncError::MissingProviderId)?;
        let response = self.client.delete_customer(customer_id.as_str()).await?;

        if response.deleted {
            self.observer.on_event(&SyncEvent::Deleted {
                customer_id: customer_id.as_str(),
            });
            self.linked_id = None;
            self.links
                .unlink(self.record.email_address(), &customer_id)
                .await?;
        }

        Ok(Some(response))
    }

    /// Whether the Stripe customer exists, according to the existence policy.
    ///
    /// A not-found answer from Stripe yields `false`, as does a deleted
    /// customer's tombstone.
    ///
    /// # Errors
    ///
    /// Returns any other Stripe error.
    pub async fn exists(&self) -> Result<bool, SyncError> {
        let lookup_id = match self.existence {
            ExistencePolicy::Legacy => {
                if !self.has_stored_identifier() {
                    // A blank ID cannot name a customer; answer not-found
                    // without sending a request.
                    self.observer.on_event(&SyncEvent::RetrieveNotFound {
                        customer_id: self.record.provider_id().unwrap_or_default(),
                    });
                }
                return Ok(false);
            }
            ExistencePolicy::VerifyStoredId => match self.customer_id() {
                Some(id) => id,
                None => return Ok(false),
            },
        };

        match self.client.retrieve_customer(lookup_id.as_str()).await {
            Ok(customer) => {
                self.observer
                    .on_event(&SyncEvent::RetrieveSucceeded { customer: &customer });
                Ok(!customer.deleted)
            }
            Err(err) if err.is_not_found() => {
                self.observer.on_event(&SyncEvent::RetrieveNotFound {
                    customer_id: lookup_id.as_str(),
                });
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for CustomerSync<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerSync")
            .field("client", &self.client)
            .field("record", &self.record)
            .field("linked_id", &self.linked_id)
            .field("existence", &self.existence)
            .field("delete_guard", &self.delete_guard)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use betfund_core::LocalCustomer;

    fn sync(record: LocalCustomer) -> CustomerSync<LocalCustomer> {
        let client = StripeClient::with_base_url("sk_test_xxx", "http://127.0.0.1:9").unwrap();
        CustomerSync::new(record, client)
    }

    #[test]
    fn defaults() {
        let facade = sync(LocalCustomer::new("a@example.com", "A", "B"));
        assert_eq!(facade.existence, ExistencePolicy::VerifyStoredId);
        assert_eq!(facade.delete_guard, DeleteGuard::Abort);
    }

    #[test]
    fn stored_identifier_from_record() {
        let facade = sync(LocalCustomer::new("a@example.com", "A", "B").with_stripe_id("cus_1"));
        assert!(facade.has_stored_identifier());
        assert_eq!(facade.customer_id().unwrap().as_str(), "cus_1");
    }

    #[test]
    fn blank_identifier_is_not_stored() {
        let facade = sync(LocalCustomer::new("a@example.com", "A", "B").with_stripe_id(""));
        assert!(!facade.has_stored_identifier());
        assert!(facade.customer_id().is_none());
    }

    #[tokio::test]
    async fn verify_policy_skips_lookup_without_id() {
        // The client points at a closed port; any request would fail.
        let facade = sync(LocalCustomer::new("a@example.com", "A", "B"));
        assert!(!facade.exists().await.unwrap());
    }

    #[test]
    fn borrowed_record() {
        let record = LocalCustomer::new("a@example.com", "Ada", "Lovelace").with_stripe_id("cus_1");
        let client = StripeClient::with_base_url("sk_test_xxx", "http://127.0.0.1:9").unwrap();
        let facade = CustomerSync::new(&record, client);
        assert_eq!(facade.record().email_address(), "a@example.com");
        assert_eq!(facade.record().display_name(), "Ada Lovelace");
        assert_eq!(facade.customer_id().unwrap().as_str(), "cus_1");
    }

    #[tokio::test]
    async fn legacy_policy_without_id_sends_nothing() {
        // The client points at a closed port; any request would fail.
        let facade = sync(LocalCustomer::new("a@example.com", "A", "B"))
            .with_existence_policy(ExistencePolicy::Legacy);
        assert!(!facade.exists().await.unwrap());
    }

    #[tokio::test]
    async fn legacy_policy_reports_missing_with_id() {
        let facade = sync(LocalCustomer::new("a@example.com", "A", "B").with_stripe_id("cus_1"))
            .with_existence_policy(ExistencePolicy::Legacy);
        assert!(!facade.exists().await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_missing_email() {
        let mut facade = sync(LocalCustomer::new("", "A", "B"));
        let err = facade.create().await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidRecord(_)));
    }

    #[tokio::test]
    async fn abort_guard_skips_delete_without_id() {
        let mut facade = sync(LocalCustomer::new("a@example.com", "A", "B"));
        assert!(facade.delete().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn proceed_guard_without_id_fails_locally() {
        let mut facade = sync(LocalCustomer::new("a@example.com", "A", "B"))
            .with_delete_guard(DeleteGuard::Proceed);
        let err = facade.delete().await.unwrap_err();
        assert!(matches!(err, SyncError::MissingProviderId));
    }
}
