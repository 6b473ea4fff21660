use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use sample_core::secret::Secret;
use sample_core::{IdentifierStrategy, ProviderError, SampleProduct, SampleRequest};
use sample_infra::app_config::{HttpConfig, MarketingConfig, ServerConfig, ShippingConfig};
use sample_infra::{build_orchestrator, Config, JsonTransport, OutboundRequest, ReqwestTransport};
use sample_order::{PipelineSettings, Step};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn create_order(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    // base64("user:pass")
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Basic dXNlcjpwYXNz") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "errors": ["unauthorized"] })));
    }
    if body["receiver_contact"]["postalcode"] == json!("") {
        let errors = json!({ "errors": { "postalcode": ["required"] } });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors));
    }
    let created = json!({ "data": { "id": "qls-1", "reference": body["reference"] } });
    (StatusCode::CREATED, Json(created))
}

async fn create_profile(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if headers.get("revision").is_none() {
        let errors = json!({ "errors": [{ "code": "missing_revision" }] });
        return (StatusCode::BAD_REQUEST, Json(errors));
    }
    (StatusCode::CREATED, Json(json!({ "data": { "type": "profile", "id": "01HPROFILE" } })))
}

async fn attach_profile() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn slow() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(2)).await;
    StatusCode::OK
}

async fn html() -> &'static str {
    "<html>maintenance</html>"
}

async fn spawn_provider() -> SocketAddr {
    let app = Router::new()
        .route("/companies/company-1/fulfillment/orders", post(create_order))
        .route("/api/profiles/", post(create_profile))
        .route("/api/lists/LIST1/relationships/profiles/", post(attach_profile))
        .route("/slow", post(slow))
        .route("/html", post(html));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr) -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0 },
        http: HttpConfig { timeout_seconds: 5 },
        shipping: ShippingConfig {
            base_url: format!("http://{}", addr),
            order_path: "/companies/{company_id}/fulfillment/orders".to_string(),
            username: "user".to_string(),
            password: Secret::from("pass"),
            company_id: "company-1".to_string(),
        },
        product: SampleProduct {
            brand_id: "brand-1".to_string(),
            product_id: "product-1".to_string(),
            product_name: "GRATIS Sample Doosje".to_string(),
            customer_reference: "Gratis Sample Doosje Campagne".to_string(),
            country: "NL".to_string(),
        },
        marketing: MarketingConfig {
            enabled: true,
            base_url: format!("http://{}/api", addr),
            api_key: Secret::from("pk_test"),
            auth_scheme: "Klaviyo-API-Key".to_string(),
            revision: "2024-10-15".to_string(),
            list_id: Some("LIST1".to_string()),
            identifier: IdentifierStrategy::ProviderId,
            include_address: true,
        },
        pipeline: PipelineSettings::default(),
    }
}

fn request(postalcode: &str) -> SampleRequest {
    SampleRequest {
        name: "Jan".to_string(),
        email: "jan@x.nl".to_string(),
        street: "Kerkstraat".to_string(),
        housenumber: "1".to_string(),
        postalcode: postalcode.to_string(),
        city: "Utrecht".to_string(),
        phone: String::new(),
    }
}

fn outbound(url: String) -> OutboundRequest {
    OutboundRequest {
        url,
        authorization: Secret::from("Bearer test"),
        headers: Vec::new(),
        content_type: "application/json",
        body: json!({}),
    }
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let addr = spawn_provider().await;
    let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap());
    let orchestrator = build_orchestrator(&config(addr), transport);

    let outcome = orchestrator.run(&request("1234AB")).await.unwrap();

    assert_eq!(outcome.order_id, "qls-1");
    assert_eq!(outcome.order["reference"], json!(outcome.reference));
    let marketing = outcome.marketing.unwrap();
    assert_eq!(marketing.profile_id.as_deref(), Some("01HPROFILE"));
    // 204 from the list endpoint
    assert!(marketing.list.is_none());
}

#[tokio::test]
async fn test_order_rejection_over_http() {
    let addr = spawn_provider().await;
    let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap());
    let orchestrator = build_orchestrator(&config(addr), transport);

    let failure = orchestrator.run(&request("")).await.unwrap_err();

    assert_eq!(failure.step, Step::CreateOrder);
    assert_eq!(failure.details(), Some(json!({ "errors": { "postalcode": ["required"] } })));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let addr = spawn_provider().await;
    let transport = ReqwestTransport::new(Duration::from_millis(200)).unwrap();

    let request = outbound(format!("http://{}/slow", addr));

    let err = transport.post_json("qls", request).await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport { timed_out: true, .. }));
    assert!(!err.is_downstream_reply());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();

    let request = outbound(format!("http://{}/gone", addr));

    let err = transport.post_json("qls", request).await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport { timed_out: false, .. }));
}

#[tokio::test]
async fn test_raw_reply_is_returned_for_any_status() {
    let addr = spawn_provider().await;
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

    let request = outbound(format!("http://{}/html", addr));
    let reply = transport.post_json("qls", request).await.unwrap();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "<html>maintenance</html>");

    let request = outbound(format!("http://{}/missing", addr));
    let reply = transport.post_json("qls", request).await.unwrap();
    assert_eq!(reply.status, 404);
}
