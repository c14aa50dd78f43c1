//! # Offering Types
//!
//! Purchasable offerings for the storefront.
//! The seed table is loaded from `config/offerings.toml`; a copy of that file
//! is compiled in and used when no file is found at startup.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Offering table compiled into the binary.
const BUILTIN_OFFERINGS: &str = include_str!("../../../config/offerings.toml");

/// How an offering is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingKind {
    /// Single payment
    #[default]
    OneTime,
    /// Recurring subscription
    Subscription,
}

impl BillingKind {
    /// Stored/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingKind::OneTime => "one-time",
            BillingKind::Subscription => "subscription",
        }
    }

    /// Parse a stored value. Anything other than `subscription` bills once.
    pub fn from_stored(value: &str) -> Self {
        if value == "subscription" {
            BillingKind::Subscription
        } else {
            BillingKind::OneTime
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, BillingKind::Subscription)
    }
}

impl std::fmt::Display for BillingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable service or product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    /// Stable external key (e.g., "consultation")
    pub service_id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Price in cents
    pub price_cents: i64,

    /// One-time or subscription
    #[serde(default)]
    pub billing_kind: BillingKind,

    /// Product identifier owned by the payment provider
    pub provider_product_id: String,

    /// Price identifier owned by the payment provider
    pub provider_price_id: String,
}

impl Offering {
    /// Format the price for display (e.g., "$300.00")
    pub fn display_price(&self) -> String {
        let sign = if self.price_cents < 0 { "-" } else { "" };
        let cents = self.price_cents.unsigned_abs();
        format!("{}${}.{:02}", sign, cents / 100, cents % 100)
    }

    pub fn is_subscription(&self) -> bool {
        self.billing_kind.is_recurring()
    }
}

/// Declarative table of offerings used to seed the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferingTable {
    #[serde(default)]
    pub offerings: Vec<Offering>,
}

impl OfferingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            offerings: Vec::new(),
        }
    }

    /// The table shipped with the service
    pub fn builtin() -> CheckoutResult<Self> {
        Self::from_toml(BUILTIN_OFFERINGS)
    }

    /// Parse and validate a table from a TOML string
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        let table: Self = toml::from_str(toml_str)
            .map_err(|e| CheckoutError::InvalidCatalog(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a table from a file
    pub fn load(path: impl AsRef<Path>) -> CheckoutResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Builder: add an offering
    pub fn with_offering(mut self, offering: Offering) -> Self {
        self.offerings.push(offering);
        self
    }

    /// Check the table before anything is inserted.
    ///
    /// Identifiers must be non-empty and unique, prices non-negative and
    /// every offering must reference a provider price.
    pub fn validate(&self) -> CheckoutResult<()> {
        let mut seen = HashSet::new();
        for offering in &self.offerings {
            if offering.service_id.is_empty() {
                return Err(CheckoutError::InvalidCatalog(format!(
                    "offering '{}' has an empty service_id",
                    offering.name
                )));
            }
            if !seen.insert(offering.service_id.as_str()) {
                return Err(CheckoutError::InvalidCatalog(format!(
                    "duplicate service_id: {}",
                    offering.service_id
                )));
            }
            if offering.price_cents < 0 {
                return Err(CheckoutError::InvalidCatalog(format!(
                    "negative price for {}: {}",
                    offering.service_id, offering.price_cents
                )));
            }
            if offering.provider_price_id.is_empty() {
                return Err(CheckoutError::InvalidCatalog(format!(
                    "missing provider_price_id for {}",
                    offering.service_id
                )));
            }
        }
        Ok(())
    }

    /// Find an offering by service ID
    pub fn get(&self, service_id: &str) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.service_id == service_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offering> {
        self.offerings.iter()
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}
