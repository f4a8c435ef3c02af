//! Stripe customer synchronization for betfund.
//!
//! [`CustomerSync`] keeps one local user record in step with its Stripe
//! customer: create it at most once, check that it exists before mutating
//! it, and delete it.
//!
//! # Example
//!
//! ```no_run
//! use betfund_core::LocalCustomer;
//! use betfund_stripe::CustomerSync;
//!
//! # async fn example() -> Result<(), betfund_stripe::SyncError> {
//! let record = LocalCustomer::new("ada@example.com", "Ada", "Lovelace");
//! let mut sync = CustomerSync::from_env(record)?;
//!
//! if let Some(customer) = sync.create().await? {
//!     println!("Created Stripe customer {}", customer.id);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod observer;
pub mod sync;
pub mod types;

pub use client::{StripeClient, StripeError};
pub use config::{ConfigError, StripeConfig};
pub use error::SyncError;
pub use link::{CustomerLinkStore, LinkError, NoopLinkStore};
pub use observer::{SyncEvent, SyncObserver, TracingObserver};
pub use sync::{CustomerSync, DeleteGuard, ExistencePolicy};
pub use types::*;
