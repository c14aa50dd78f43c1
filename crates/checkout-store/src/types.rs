//! Database row types.

use checkout_core::{BillingKind, Offering, PriceLookup};
use sqlx::FromRow;

/// Offering row from database.
#[derive(FromRow)]
pub struct DbOffering {
    pub service_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub billing_kind: String,
    pub provider_product_id: String,
    pub provider_price_id: String,
}

impl DbOffering {
    pub fn into_domain(self) -> Offering {
        Offering {
            service_id: self.service_id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            price_cents: self.price_cents,
            billing_kind: BillingKind::from_stored(&self.billing_kind),
            provider_product_id: self.provider_product_id,
            provider_price_id: self.provider_price_id,
        }
    }
}

/// Price columns needed to start a checkout.
#[derive(FromRow)]
pub struct DbPriceLookup {
    pub provider_price_id: String,
    pub billing_kind: String,
}

impl DbPriceLookup {
    pub fn into_domain(self) -> PriceLookup {
        PriceLookup {
            price_id: self.provider_price_id,
            billing_kind: BillingKind::from_stored(&self.billing_kind),
        }
    }
}
