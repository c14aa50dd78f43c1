//! # Checkout Session Types
//!
//! Requests sent to, and sessions returned by, a hosted checkout provider.

use crate::offering::BillingKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    #[default]
    Payment,
    /// Subscription
    Subscription,
}

impl CheckoutMode {
    /// Mode used to sell an offering of the given billing kind
    pub fn for_billing(kind: BillingKind) -> Self {
        if kind.is_recurring() {
            CheckoutMode::Subscription
        } else {
            CheckoutMode::Payment
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
        }
    }
}

/// A line item referencing a provider-side price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Provider price identifier
    pub price_id: String,
    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    pub fn new(price_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            price_id: price_id.into(),
            quantity,
        }
    }
}

/// Everything a provider needs to open a hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub line_items: Vec<LineItem>,
    pub mode: CheckoutMode,
    /// Redirect after payment; may contain the provider's session-id placeholder
    pub success_url: String,
    /// Redirect if the customer backs out
    pub cancel_url: String,
}

/// Status of a checkout session as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// Session created, awaiting payment
    Open,
    /// Payment completed successfully
    Complete,
    /// Session expired
    Expired,
}

impl CheckoutStatus {
    /// Parse a provider status string, ignoring unknown values
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "open" => Some(CheckoutStatus::Open),
            "complete" => Some(CheckoutStatus::Complete),
            "expired" => Some(CheckoutStatus::Expired),
            _ => None,
        }
    }
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// Hosted page to redirect the customer to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckoutStatus>,

    /// Provider payment status (e.g., "paid", "unpaid")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,

    /// Customer ID (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CheckoutSession {
    /// Create a session with only its identity known
    pub fn new(session_id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            provider: provider.into(),
            checkout_url: None,
            status: None,
            payment_status: None,
            customer_id: None,
            expires_at: None,
        }
    }

    /// Check if session is still open
    pub fn is_active(&self) -> bool {
        matches!(self.status, Some(CheckoutStatus::Open) | None)
            && self.expires_at.map(|exp| exp > Utc::now()).unwrap_or(true)
    }
}
