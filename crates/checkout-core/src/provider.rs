//! # Checkout Provider Trait
//!
//! Strategy trait for hosted checkout providers, plus the catalog lookup
//! seam the checkout initiator resolves offerings through.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │       CheckoutProvider (trait)       │
//! │  ├── create_session()                │
//! │  ├── retrieve_session()              │
//! │  └── provider_name()                 │
//! └──────────────────────────────────────┘
//!                    ▲
//!          ┌─────────┴─────────┐
//!  ┌───────┴────────┐  ┌───────┴───────┐
//!  │ StripeCheckout │  │  test fakes   │
//!  │    Provider    │  │               │
//!  └────────────────┘  └───────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::offering::{BillingKind, Offering, OfferingTable};
use crate::session::{CheckoutSession, SessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Placeholder the provider replaces with the real session ID on redirect
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Hosted checkout provider.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Open a hosted checkout session.
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<CheckoutSession>;

    /// Fetch an existing session by ID.
    async fn retrieve_session(&self, session_id: &str) -> CheckoutResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared checkout provider (dynamic dispatch)
pub type BoxedCheckoutProvider = Arc<dyn CheckoutProvider>;

/// What checkout needs to know about an offering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLookup {
    /// Provider price identifier
    pub price_id: String,
    pub billing_kind: BillingKind,
}

/// Read-only offering lookup.
#[async_trait]
pub trait OfferingCatalog: Send + Sync {
    /// Resolve a service ID to its provider price, `None` if unknown.
    async fn lookup(&self, service_id: &str) -> CheckoutResult<Option<PriceLookup>>;

    /// Every purchasable offering, in catalog order.
    async fn list(&self) -> CheckoutResult<Vec<Offering>>;
}

/// Type alias for a shared offering catalog
pub type BoxedOfferingCatalog = Arc<dyn OfferingCatalog>;

#[async_trait]
impl OfferingCatalog for OfferingTable {
    async fn lookup(&self, service_id: &str) -> CheckoutResult<Option<PriceLookup>> {
        Ok(self.get(service_id).map(|o| PriceLookup {
            price_id: o.provider_price_id.clone(),
            billing_kind: o.billing_kind,
        }))
    }

    async fn list(&self) -> CheckoutResult<Vec<Offering>> {
        Ok(self.offerings.clone())
    }
}

/// Redirect URLs handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// Page the customer lands on after paying
    pub success_url: String,
    /// Page the customer lands on after backing out
    pub cancel_url: String,
}

impl CheckoutUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    /// Get the success URL with the session_id placeholder appended
    pub fn success_url_with_session(&self) -> String {
        let separator = if self.success_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}session_id={}",
            self.success_url, separator, SESSION_ID_PLACEHOLDER
        )
    }
}
