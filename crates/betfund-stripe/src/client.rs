//! Stripe API client implementation.

use reqwest::{Client, StatusCode, Url};
use std::fmt;
use std::time::Duration;

use crate::config::StripeConfig;
use crate::types::{Customer, DeletedCustomer, StripeErrorResponse, StripeList};

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {status} {error_type} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type (e.g. `invalid_request_error`).
        error_type: String,
        /// Error message.
        message: String,
        /// Error code (e.g. `resource_missing`).
        code: Option<String>,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Customer ID that cannot name a single customer.
    #[error("Invalid customer ID: {0:?}")]
    InvalidId(String),
}

impl StripeError {
    /// Whether Stripe reported that the requested object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                *status == StatusCode::NOT_FOUND.as_u16()
                    || code.as_deref() == Some("resource_missing")
            }
            _ => false,
        }
    }
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StripeClient {
    /// Stripe API base URL.
    pub const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

    /// Create a new Stripe client against the public API.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, StripeError> {
        Self::build(
            api_key.into(),
            Self::BASE_URL.to_string(),
            Duration::from_secs(Self::DEFAULT_TIMEOUT_SECONDS),
        )
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client cannot be built.
    pub fn from_config(config: &StripeConfig) -> Result<Self, StripeError> {
        Self::build(
            config.api_key.clone(),
            config.api_base.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Create a client against a different base URL (e.g. a mock server).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, StripeError> {
        Self::build(
            api_key.into(),
            base_url.into(),
            Duration::from_secs(Self::DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn build(api_key: String, base_url: String, timeout: Duration) -> Result<Self, StripeError> {
        if api_key.trim().is_empty() {
            return Err(StripeError::Configuration("Stripe API key is empty".into()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List customers.
    ///
    /// `limit` is forwarded as-is; Stripe enforces its own bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it.
    pub async fn list_customers(
        &self,
        limit: Option<u32>,
    ) -> Result<StripeList<Customer>, StripeError> {
        let mut request = self
            .client
            .get(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None);

        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }

        tracing::debug!(limit = ?limit, "Listing Stripe customers");

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Create a new Stripe customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it.
    pub async fn create_customer(&self, email: &str, name: &str) -> Result<Customer, StripeError> {
        let params = [("email", email), ("name", name)];

        tracing::debug!(email = %email, "Creating Stripe customer");

        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a customer by ID.
    ///
    /// A deleted customer comes back as a tombstone with `deleted` set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it, including
    /// the not-found case (see [`StripeError::is_not_found`]).
    pub async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, StripeError> {
        let response = self
            .client
            .get(self.customer_url(customer_id)?)
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe rejects it.
    pub async fn delete_customer(&self, customer_id: &str) -> Result<DeletedCustomer, StripeError> {
        tracing::debug!(customer_id = %customer_id, "Deleting Stripe customer");

        let response = self
            .client
            .delete(self.customer_url(customer_id)?)
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// URL of a single customer, with the ID percent-encoded as one path segment.
    fn customer_url(&self, customer_id: &str) -> Result<Url, StripeError> {
        if matches!(customer_id.trim(), "" | "." | "..") {
            return Err(StripeError::InvalidId(customer_id.to_string()));
        }

        let mut url = Url::parse(&format!("{}/customers", self.base_url))
            .map_err(|e| StripeError::Configuration(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| StripeError::Configuration("base URL cannot have a path".into()))?
            .push(customer_id);

        Ok(url)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                status: status.as_u16(),
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                status: status.as_u16(),
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

impl fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
