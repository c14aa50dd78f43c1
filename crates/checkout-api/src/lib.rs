//! # checkout-api
//!
//! HTTP layer for the storefront checkout service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout-session endpoint used by the storefront
//! - Landing, success and cancel pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Landing page |
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout-session` | Create checkout session |
//! | GET | `/success` | Success page |
//! | GET | `/cancel` | Cancel page |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
