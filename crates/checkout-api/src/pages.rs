//! HTML pages rendered with askama.

use askama::Template;
use axum::response::Html;
use checkout_core::Offering;

/// Shown on the success page when no session ID came back.
pub const MISSING_SESSION_ID: &str = "N/A";

/// Landing page listing the offerings.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub offerings: Vec<OfferingView>,
}

/// One offering as displayed on the landing page.
pub struct OfferingView {
    pub service_id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub subscription: bool,
}

impl From<&Offering> for OfferingView {
    fn from(offering: &Offering) -> Self {
        Self {
            service_id: offering.service_id.clone(),
            name: offering.name.clone(),
            description: offering.description.clone(),
            price: offering.display_price(),
            subscription: offering.is_subscription(),
        }
    }
}

impl IndexPage {
    pub fn new(offerings: &[Offering]) -> Self {
        Self {
            offerings: offerings.iter().map(OfferingView::from).collect(),
        }
    }
}

/// Post-payment confirmation page.
#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessPage<'a> {
    pub session_id: &'a str,
}

impl<'a> SuccessPage<'a> {
    pub fn new(session_id: Option<&'a str>) -> Self {
        Self {
            session_id: session_id.unwrap_or(MISSING_SESSION_ID),
        }
    }
}

/// Shown when the customer backs out of checkout.
#[derive(Template)]
#[template(path = "cancel.html")]
pub struct CancelPage;

/// Render a template, falling back to a plain error body.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}
