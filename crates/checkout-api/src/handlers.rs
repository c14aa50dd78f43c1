//! # Request Handlers
//!
//! Axum request handlers for the checkout API and its pages.

use crate::pages::{render, CancelPage, IndexPage, SuccessPage};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use checkout_core::CheckoutError;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Returned when the request body is not a JSON object we can read.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session request
#[derive(Debug, Default, Deserialize)]
pub struct CreateCheckoutSessionRequest {
    /// Offering to buy
    #[serde(default)]
    pub service_id: Option<String>,
}

/// Create checkout session response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutSessionResponse {
    /// Provider session ID; the browser redirects with it
    pub id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query string of the success redirect
#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    #[serde(default)]
    pub session_id: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Convert CheckoutError to an HTTP response, logging the cause
fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_provider_error() {
        error!("Payment provider error: {}", err);
    } else if status.is_server_error() {
        error!("Checkout failed: {}", err);
    } else {
        warn!("Checkout rejected: {}", err);
    }

    (status, Json(ErrorResponse::new(err.public_message())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Landing page
pub async fn index(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let offerings = state.catalog.list().await.map_err(|e| {
        error!("Failed to list offerings: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("Internal Server Error".to_string()),
        )
    })?;

    Ok(render(&IndexPage::new(&offerings)))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "checkout-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Start a hosted checkout for one offering
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutSessionResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected checkout request body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(INVALID_JSON_MESSAGE)),
        )
    })?;

    let session = state
        .initiator
        .initiate(request.service_id.as_deref())
        .await
        .map_err(checkout_error_to_response)?;

    Ok(Json(CreateCheckoutSessionResponse {
        id: session.session_id,
    }))
}

/// Checkout success page
///
/// Looks the session up for the log only; the page renders either way.
pub async fn checkout_success(
    State(state): State<AppState>,
    Query(params): Query<SuccessParams>,
) -> Html<String> {
    let session_id = params.session_id.filter(|id| !id.is_empty());

    if let Some(id) = session_id.as_deref() {
        match state.provider().retrieve_session(id).await {
            Ok(session) => info!(
                "Successful checkout: session={} customer={} status={:?} active={}",
                session.session_id,
                session.customer_id.as_deref().unwrap_or("unknown"),
                session.status,
                session.is_active()
            ),
            Err(e) => warn!("Could not retrieve checkout session {}: {}", id, e),
        }
    }

    render(&SuccessPage::new(session_id.as_deref()))
}

/// Checkout cancel page
pub async fn checkout_cancel() -> Html<String> {
    render(&CancelPage)
}
