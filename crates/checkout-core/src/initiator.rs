//! # Checkout Initiator
//!
//! Resolves an offering and opens a hosted checkout session for it.

use crate::error::{CheckoutError, CheckoutResult};
use crate::provider::{BoxedCheckoutProvider, BoxedOfferingCatalog, CheckoutUrls};
use crate::session::{CheckoutMode, CheckoutSession, LineItem, SessionRequest};
use tracing::{debug, info, instrument};

/// Message returned when a checkout request carries no service ID.
pub const SERVICE_ID_REQUIRED_MESSAGE: &str = "service_id is required";

/// Starts hosted checkouts for single offerings
#[derive(Clone)]
pub struct CheckoutInitiator {
    catalog: BoxedOfferingCatalog,
    provider: BoxedCheckoutProvider,
    urls: CheckoutUrls,
}

impl CheckoutInitiator {
    pub fn new(
        catalog: BoxedOfferingCatalog,
        provider: BoxedCheckoutProvider,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            catalog,
            provider,
            urls,
        }
    }

    pub fn provider(&self) -> &BoxedCheckoutProvider {
        &self.provider
    }

    /// Build the provider request for one unit of a price
    pub fn session_request(&self, price_id: &str, mode: CheckoutMode) -> SessionRequest {
        SessionRequest {
            line_items: vec![LineItem::new(price_id, 1)],
            mode,
            success_url: self.urls.success_url_with_session(),
            cancel_url: self.urls.cancel_url.clone(),
        }
    }

    /// Open a checkout session for `service_id`.
    ///
    /// A missing or empty identifier is an invalid request; an unknown one
    /// is `OfferingNotFound`. Provider failures are returned unchanged.
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn initiate(&self, service_id: Option<&str>) -> CheckoutResult<CheckoutSession> {
        let service_id = service_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CheckoutError::InvalidRequest(SERVICE_ID_REQUIRED_MESSAGE.to_string()))?;

        let price = self
            .catalog
            .lookup(service_id)
            .await?
            .ok_or_else(|| CheckoutError::OfferingNotFound {
                service_id: service_id.to_string(),
            })?;

        let mode = CheckoutMode::for_billing(price.billing_kind);
        let request = self.session_request(&price.price_id, mode);

        debug!(
            "Requesting checkout session: service_id={}, price={}, mode={}",
            service_id,
            price.price_id,
            mode.as_str()
        );

        let session = self.provider.create_session(&request).await?;

        info!(
            "Created checkout session {} for {}",
            session.session_id, service_id
        );

        Ok(session)
    }
}
