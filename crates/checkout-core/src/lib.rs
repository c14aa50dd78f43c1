//! # checkout-core
//!
//! Core types and traits for the storefront checkout service.
//!
//! This crate provides:
//! - `Offering` and `OfferingTable` for the seeded catalog
//! - `CheckoutProvider` and `OfferingCatalog` traits at the provider and storage seams
//! - `CheckoutInitiator`, which turns a service ID into a hosted checkout session
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutInitiator, CheckoutUrls};
//!
//! let initiator = CheckoutInitiator::new(catalog, provider, CheckoutUrls::new(
//!     "https://shop.example/success",
//!     "https://shop.example/cancel",
//! ));
//!
//! let session = initiator.initiate(Some("consultation")).await?;
//! // Hand session.session_id to the browser
//! ```

pub mod error;
pub mod initiator;
pub mod offering;
pub mod provider;
pub mod session;

// Re-exports for convenience
pub use error::{CheckoutError, CheckoutResult, INTERNAL_ERROR_MESSAGE, OFFERING_NOT_FOUND_MESSAGE};
pub use initiator::{CheckoutInitiator, SERVICE_ID_REQUIRED_MESSAGE};
pub use offering::{BillingKind, Offering, OfferingTable};
pub use provider::{
    BoxedCheckoutProvider, BoxedOfferingCatalog, CheckoutProvider, CheckoutUrls,
    OfferingCatalog, PriceLookup, SESSION_ID_PLACEHOLDER,
};
pub use session::{CheckoutMode, CheckoutSession, CheckoutStatus, LineItem, SessionRequest};
