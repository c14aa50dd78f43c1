//! # checkout-store
//!
//! SQLite persistence for the storefront checkout service.
//!
//! The store owns four tables: `offerings`, `users`, `orders` and
//! `order_items`. Only `offerings` is read and written at runtime; it is
//! seeded from an [`OfferingTable`](checkout_core::OfferingTable) at startup
//! and implements [`OfferingCatalog`](checkout_core::OfferingCatalog) for
//! checkout lookups. The user and order tables are schema only.
//!
//! ```rust,ignore
//! let store = SqliteStore::connect("sqlite://data/checkout.db").await?;
//! store.create_schema().await?;
//! store.seed(&OfferingTable::builtin()?).await?;
//! ```

pub mod sqlite;
mod types;

pub use sqlite::{SeedReport, SqliteStore};
