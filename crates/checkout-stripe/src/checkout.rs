//! # Stripe Checkout Sessions
//!
//! Client for the Stripe Checkout Sessions API.
//! Sessions reference prices that already exist in Stripe, so only the price
//! ID and quantity are sent per line item.

use crate::config::StripeConfig;
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutProvider, CheckoutResult, CheckoutSession, CheckoutStatus,
    SessionRequest,
};
use chrono::DateTime;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session provider
///
/// Uses Stripe's hosted checkout page, so card data never touches this service.
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new Stripe checkout provider
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form fields for `POST /v1/checkout/sessions`
    fn form_params(request: &SessionRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), request.mode.as_str().to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            params.push((format!("line_items[{}][price]", i), item.price_id.clone()));
            params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        params
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.config.api_base_url)
    }

    fn session_url(&self, session_id: &str) -> CheckoutResult<Url> {
        let mut url = Url::parse(&self.sessions_url())
            .map_err(|e| CheckoutError::Configuration(format!("Invalid Stripe URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CheckoutError::Configuration("Invalid Stripe URL".to_string()))?
            .push(session_id);
        Ok(url)
    }

    /// Turn a Stripe response into a session or a typed error
    async fn read_session(response: Response) -> CheckoutResult<CheckoutSession> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(CheckoutError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(CheckoutError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(session.into_session())
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    #[instrument(skip(self, request), fields(mode = request.mode.as_str(), items = request.line_items.len()))]
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<CheckoutSession> {
        if request.line_items.is_empty() {
            return Err(CheckoutError::InvalidRequest(
                "Checkout session has no line items".to_string(),
            ));
        }

        let form_params = Self::form_params(request);
        let idempotency_key = Uuid::new_v4().to_string();

        debug!("Creating Stripe checkout session, idempotency_key={}", idempotency_key);

        let response = self
            .client
            .post(self.sessions_url())
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let session = Self::read_session(response).await?;

        info!(
            "Created Stripe checkout session: id={}, url={:?}",
            session.session_id, session.checkout_url
        );

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn retrieve_session(&self, session_id: &str) -> CheckoutResult<CheckoutSession> {
        let url = self.session_url(session_id)?;

        let response = self
            .client
            .get(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        Self::read_session(response).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

impl StripeCheckoutSessionResponse {
    fn into_session(self) -> CheckoutSession {
        CheckoutSession {
            session_id: self.id,
            provider: PROVIDER.to_string(),
            checkout_url: self.url,
            status: self.status.as_deref().and_then(CheckoutStatus::from_provider),
            payment_status: self.payment_status,
            customer_id: self.customer,
            expires_at: self
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
