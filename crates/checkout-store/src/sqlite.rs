//! SQLite store: schema, catalog seeding and offering lookup.

use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, Offering, OfferingCatalog, OfferingTable, PriceLookup,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info, instrument};

use crate::types::{DbOffering, DbPriceLookup};

const SCHEMA: &str = include_str!("../migrations/0001_create_tables.sql");

fn storage_error(e: sqlx::Error) -> CheckoutError {
    CheckoutError::Storage(e.to_string())
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// SQLite-backed catalog and order store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> CheckoutResult<Self> {
        // Ensure on-disk target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await.map_err(|e| {
                            CheckoutError::Configuration(format!(
                                "Failed to create {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(storage_error)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives only as long as its connection.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        debug!("Connected to {}", database_url);
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the offerings, users, orders and order_items tables if absent.
    pub async fn create_schema(&self) -> CheckoutResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Insert every offering of `table` whose service ID is not stored yet.
    ///
    /// Existing rows are left untouched. The table is validated before the
    /// first insert and all inserts share one transaction.
    #[instrument(skip(self, table), fields(offerings = table.len()))]
    pub async fn seed(&self, table: &OfferingTable) -> CheckoutResult<SeedReport> {
        table.validate()?;

        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        let mut report = SeedReport::default();

        for offering in table.iter() {
            let result = sqlx::query(
                r#"INSERT INTO offerings
                       (service_id, name, description, price_cents, billing_kind, provider_product_id, provider_price_id)
                   VALUES (?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(service_id) DO NOTHING"#,
            )
            .bind(&offering.service_id)
            .bind(&offering.name)
            .bind(&offering.description)
            .bind(offering.price_cents)
            .bind(offering.billing_kind.as_str())
            .bind(&offering.provider_product_id)
            .bind(&offering.provider_price_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                debug!("Offering already exists, skipping: {}", offering.name);
                report.skipped += 1;
            } else {
                info!("Inserted new offering: {}", offering.name);
                report.inserted += 1;
            }
        }

        tx.commit().await.map_err(storage_error)?;

        info!(
            "Catalog seeded: {} inserted, {} already present",
            report.inserted, report.skipped
        );
        Ok(report)
    }

    /// All offerings in insertion order.
    pub async fn list_offerings(&self) -> CheckoutResult<Vec<Offering>> {
        let rows: Vec<DbOffering> = sqlx::query_as(
            r#"SELECT service_id, name, description, price_cents, billing_kind, provider_product_id, provider_price_id
               FROM offerings ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(DbOffering::into_domain).collect())
    }

    pub async fn count_offerings(&self) -> CheckoutResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM offerings")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }
}

#[async_trait]
impl OfferingCatalog for SqliteStore {
    async fn lookup(&self, service_id: &str) -> CheckoutResult<Option<PriceLookup>> {
        let row: Option<DbPriceLookup> = sqlx::query_as(
            r#"SELECT provider_price_id, billing_kind FROM offerings WHERE service_id = ?"#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(DbPriceLookup::into_domain))
    }

    async fn list(&self) -> CheckoutResult<Vec<Offering>> {
        self.list_offerings().await
    }
}
