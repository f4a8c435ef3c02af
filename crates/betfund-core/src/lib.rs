//! Core types for betfund.
//!
//! This crate provides the types shared by betfund's payment integrations:
//!
//! - **Records**: `CustomerRecord`, the read-only view of a local user, and
//!   `LocalCustomer`, a plain implementation of it
//! - **Identifiers**: `StripeCustomerId`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod customer;
pub mod ids;

pub use customer::{CustomerRecord, LocalCustomer};
pub use ids::{IdError, StripeCustomerId};
