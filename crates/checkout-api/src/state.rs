//! # Application State
//!
//! Configuration and shared state for the Axum application.
//! Both are built once at startup and handed to the router; nothing here is
//! mutated afterwards.

use checkout_core::{
    BoxedCheckoutProvider, BoxedOfferingCatalog, CheckoutError, CheckoutInitiator,
    CheckoutResult, CheckoutUrls, OfferingTable,
};
use checkout_store::SqliteStore;
use checkout_stripe::{StripeCheckoutProvider, StripeConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to derive default redirect URLs
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// SQLite connection string
    pub database_url: String,
    /// Where the provider sends the customer after paying
    pub success_url: String,
    /// Where the provider sends the customer after cancelling
    pub cancel_url: String,
    /// Offering table to seed from; searched for when unset
    pub catalog_path: Option<PathBuf>,
    /// Browser origins allowed to call the API; empty allows any
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base_url = "http://localhost:8080".to_string();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            success_url: format!("{}/success", base_url),
            cancel_url: format!("{}/cancel", base_url),
            base_url,
            environment: "development".to_string(),
            database_url: "sqlite://data/checkout.db".to_string(),
            catalog_path: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, falling back to defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> CheckoutResult<Self> {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(p) => p.parse().map_err(|_| {
                CheckoutError::Configuration(format!("PORT is not a valid port: {}", p))
            })?,
            None => defaults.port,
        };

        let base_url = var("BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let config = Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            success_url: var("SUCCESS_URL").unwrap_or_else(|| format!("{}/success", base_url)),
            cancel_url: var("CANCEL_URL").unwrap_or_else(|| format!("{}/cancel", base_url)),
            base_url,
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> CheckoutResult<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            CheckoutError::Configuration(format!(
                "Invalid socket address: {}:{}",
                self.host, self.port
            ))
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Redirect URLs handed to the payment provider
    pub fn checkout_urls(&self) -> CheckoutUrls {
        CheckoutUrls::new(&self.success_url, &self.cancel_url)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Starts checkout sessions
    pub initiator: CheckoutInitiator,
    /// Offerings checkout resolves against; also listed on the landing page
    pub catalog: BoxedOfferingCatalog,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Assemble state from already-built components
    pub fn new(
        config: AppConfig,
        catalog: BoxedOfferingCatalog,
        provider: BoxedCheckoutProvider,
    ) -> Self {
        let initiator = CheckoutInitiator::new(catalog.clone(), provider, config.checkout_urls());
        Self {
            initiator,
            catalog,
            config,
        }
    }

    /// Open the database, create the schema, seed the catalog and connect Stripe
    pub async fn from_config(config: AppConfig, stripe: StripeConfig) -> anyhow::Result<Self> {
        let offerings = load_offering_table(config.catalog_path.as_deref())?;
        if offerings.is_empty() {
            warn!("Offering table is empty, nothing to seed");
        }

        let store = SqliteStore::connect(&config.database_url).await?;
        store.create_schema().await?;
        store.seed(&offerings).await?;
        info!(
            "Catalog ready: {} offerings in {}",
            store.count_offerings().await?,
            config.database_url
        );

        let provider = StripeCheckoutProvider::new(stripe)?;
        if !provider.config().is_test_mode() {
            info!("Stripe live mode enabled");
        }

        Ok(Self::new(config, Arc::new(store), Arc::new(provider)))
    }

    /// The payment provider behind the initiator
    pub fn provider(&self) -> &BoxedCheckoutProvider {
        self.initiator.provider()
    }
}

/// Load the offering table from `path`, or search the usual locations
fn load_offering_table(path: Option<&Path>) -> CheckoutResult<OfferingTable> {
    if let Some(path) = path {
        let table = OfferingTable::load(path)?;
        info!("Loaded {} offerings from {}", table.len(), path.display());
        return Ok(table);
    }

    let config_paths = [
        "config/offerings.toml",
        "../config/offerings.toml",
        "../../config/offerings.toml",
    ];

    for candidate in config_paths {
        let candidate = Path::new(candidate);
        if candidate.exists() {
            let table = OfferingTable::load(candidate)?;
            info!("Loaded {} offerings from {}", table.len(), candidate.display());
            return Ok(table);
        }
    }

    warn!("No offering table found, using built-in offerings");
    OfferingTable::builtin()
}
