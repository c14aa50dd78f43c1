//! # checkout-stripe
//!
//! Stripe provider for the storefront checkout service.
//!
//! [`StripeCheckoutProvider`] implements
//! [`CheckoutProvider`](checkout_core::CheckoutProvider) on top of the
//! Checkout Sessions API: sessions are created from existing Stripe prices
//! and can be fetched back by ID.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::StripeCheckoutProvider;
//! use checkout_core::CheckoutProvider;
//!
//! // Create provider from environment
//! let provider = StripeCheckoutProvider::from_env()?;
//!
//! let session = provider.create_session(&request).await?;
//! let again = provider.retrieve_session(&session.session_id).await?;
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutProvider;
pub use config::StripeConfig;
