//! Stripe API types.

use serde::{Deserialize, Serialize};

/// Stripe customer object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: String,
    /// Object type (always "customer").
    #[serde(default)]
    pub object: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Metadata attached to the customer.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
    /// Set on the tombstone Stripe returns when retrieving a deleted customer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

impl Customer {
    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.created, 0)
    }
}

/// Confirmation returned by `DELETE /v1/customers/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCustomer {
    /// ID of the deleted customer.
    pub id: String,
    /// Object type (always "customer").
    #[serde(default)]
    pub object: String,
    /// Whether Stripe deleted the customer.
    #[serde(default)]
    pub deleted: bool,
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeList<T> {
    /// Object type (always "list").
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    pub has_more: bool,
    /// URL for the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}
