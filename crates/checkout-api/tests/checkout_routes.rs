//! Router-level tests: real SQLite catalog, fake payment provider.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use checkout_api::{create_router, AppConfig, AppState};
use checkout_core::{
    CheckoutError, CheckoutMode, CheckoutProvider, CheckoutResult, CheckoutSession,
    CheckoutStatus, Offering, OfferingCatalog, OfferingTable, PriceLookup, SessionRequest,
    INTERNAL_ERROR_MESSAGE,
};
use checkout_store::SqliteStore;
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeProvider {
    requests: Mutex<Vec<SessionRequest>>,
    retrieved: Mutex<Vec<String>>,
    reject_with: Option<String>,
    completed_sessions: bool,
}

impl FakeProvider {
    fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn completing() -> Self {
        Self {
            completed_sessions: true,
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<SessionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<CheckoutSession> {
        if let Some(message) = &self.reject_with {
            return Err(CheckoutError::ProviderError {
                provider: "stripe".to_string(),
                message: message.clone(),
            });
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(CheckoutSession::new("cs_test_fake", "fake"))
    }

    async fn retrieve_session(&self, session_id: &str) -> CheckoutResult<CheckoutSession> {
        self.retrieved.lock().unwrap().push(session_id.to_string());
        if self.completed_sessions {
            let mut session = CheckoutSession::new(session_id, "fake");
            session.status = Some(CheckoutStatus::Complete);
            session.payment_status = Some("paid".to_string());
            session.customer_id = Some("cus_test_123".to_string());
            return Ok(session);
        }
        Err(CheckoutError::ProviderError {
            provider: "stripe".to_string(),
            message: format!("No such checkout.session: '{}'", session_id),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

struct UnavailableCatalog;

#[async_trait]
impl OfferingCatalog for UnavailableCatalog {
    async fn lookup(&self, _service_id: &str) -> CheckoutResult<Option<PriceLookup>> {
        Err(CheckoutError::Storage("unable to open database file".to_string()))
    }

    async fn list(&self) -> CheckoutResult<Vec<Offering>> {
        Err(CheckoutError::Storage("unable to open database file".to_string()))
    }
}

async fn seeded_store() -> SqliteStore {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.create_schema().await.unwrap();
    store.seed(&OfferingTable::builtin().unwrap()).await.unwrap();
    store
}

async fn app_with(config: AppConfig, provider: Arc<FakeProvider>) -> Router {
    let state = AppState::new(config, Arc::new(seeded_store().await), provider);
    create_router(state)
}

async fn app(provider: Arc<FakeProvider>) -> Router {
    app_with(AppConfig::default(), provider).await
}

fn checkout_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/create-checkout-session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_missing_service_id() {
    let provider = Arc::new(FakeProvider::default());
    let response = app(provider.clone())
        .await
        .oneshot(checkout_request("{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "service_id is required" })
    );
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_empty_service_id() {
    let response = app(Arc::new(FakeProvider::default()))
        .await
        .oneshot(checkout_request(r#"{"service_id": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "service_id is required");
}

#[tokio::test]
async fn test_unknown_service_id() {
    let provider = Arc::new(FakeProvider::default());
    let response = app(provider.clone())
        .await
        .oneshot(checkout_request(r#"{"service_id": "not-a-real-id"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Service not found in database" })
    );
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_one_time_offering_uses_payment_mode() {
    let provider = Arc::new(FakeProvider::default());
    let response = app(provider.clone())
        .await
        .oneshot(checkout_request(r#"{"service_id": "consultation"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "id": "cs_test_fake" })
    );

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.mode, CheckoutMode::Payment);
    assert_eq!(request.line_items.len(), 1);
    assert_eq!(request.line_items[0].price_id, "price_1RSfnDFYrMISfWVNFDBaOwy6");
    assert_eq!(request.line_items[0].quantity, 1);
    assert_eq!(
        request.success_url,
        "http://localhost:8080/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(request.cancel_url, "http://localhost:8080/cancel");
}

#[tokio::test]
async fn test_subscription_offering_uses_subscription_mode() {
    let provider = Arc::new(FakeProvider::default());
    let response = app(provider.clone())
        .await
        .oneshot(checkout_request(r#"{"service_id": "elite-support"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.requests()[0].mode, CheckoutMode::Subscription);
}

#[tokio::test]
async fn test_provider_error_message_passes_through() {
    let provider = Arc::new(FakeProvider::rejecting("No such price: 'price_x'"));
    let response = app(provider)
        .await
        .oneshot(checkout_request(r#"{"service_id": "consultation"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "No such price: 'price_x'" })
    );
}

#[tokio::test]
async fn test_storage_failure_is_generic_500() {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(UnavailableCatalog),
        Arc::new(FakeProvider::default()),
    );
    let response = create_router(state)
        .oneshot(checkout_request(r#"{"service_id": "consultation"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], INTERNAL_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let response = app(Arc::new(FakeProvider::default()))
        .await
        .oneshot(checkout_request("{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_success_page_without_session_id() {
    let provider = Arc::new(FakeProvider::default());
    let response = app(provider.clone()).await.oneshot(get("/success")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("N/A"));
    assert!(provider.retrieved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_success_page_survives_failed_lookup() {
    let provider = Arc::new(FakeProvider::default());
    let response = app(provider.clone())
        .await
        .oneshot(get("/success?session_id=abc123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("abc123"));
    assert_eq!(*provider.retrieved.lock().unwrap(), vec!["abc123"]);
}

#[tokio::test]
async fn test_success_page_after_completed_session() {
    let provider = Arc::new(FakeProvider::completing());
    let response = app(provider.clone())
        .await
        .oneshot(get("/success?session_id=cs_test_paid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("cs_test_paid"));
    assert!(!html.contains("N/A"));
    assert_eq!(*provider.retrieved.lock().unwrap(), vec!["cs_test_paid"]);
}

#[tokio::test]
async fn test_cancel_page() {
    let response = app(Arc::new(FakeProvider::default()))
        .await
        .oneshot(get("/cancel"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Payment Cancelled"));
    assert!(html.contains("href=\"/\""));
}

#[tokio::test]
async fn test_landing_page_and_health() {
    let router = app(Arc::new(FakeProvider::default())).await;

    let response = router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Business Management Consultation"));

    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_landing_page_lists_stored_offerings() {
    let store = seeded_store().await;
    sqlx::query(
        "INSERT INTO offerings (service_id, name, price_cents, provider_product_id, provider_price_id)
         VALUES ('site-audit', 'Site Audit', 9900, 'prod_audit', 'price_audit')",
    )
    .execute(store.pool())
    .await
    .unwrap();

    let provider = Arc::new(FakeProvider::default());
    let router = create_router(AppState::new(
        AppConfig::default(),
        Arc::new(store),
        provider.clone(),
    ));

    let response = router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-service-id=\"site-audit\""));
    assert!(html.contains("$99.00"));

    let response = router
        .oneshot(checkout_request(r#"{"service_id": "site-audit"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.requests()[0].line_items[0].price_id, "price_audit");
}

#[tokio::test]
async fn test_landing_page_storage_failure() {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(UnavailableCatalog),
        Arc::new(FakeProvider::default()),
    );
    let response = create_router(state).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body_text(response).await.contains("unable to open database file"));
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let config = AppConfig {
        cors_allowed_origins: vec!["https://realmstoriches.xyz".to_string()],
        ..AppConfig::default()
    };
    let router = app_with(config, Arc::new(FakeProvider::default())).await;

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/create-checkout-session")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = router
        .clone()
        .oneshot(preflight("https://realmstoriches.xyz"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://realmstoriches.xyz"
    );

    let response = router
        .oneshot(preflight("https://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard_allows_any_origin() {
    let config = AppConfig::from_vars(|key| {
        (key == "CORS_ALLOWED_ORIGINS").then(|| "*".to_string())
    })
    .unwrap();
    assert_eq!(config.cors_allowed_origins, vec!["*"]);

    let router = app_with(config, Arc::new(FakeProvider::default())).await;
    let response = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/create-checkout-session")
                .header(header::ORIGIN, "https://any.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .is_none());
}
