use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::XRequestId;
use api_ingress::{ApiIngress, ApiIngressConfig};

fn test_app() -> Router {
    let routes = Router::new()
        .route("/echo", get(echo_handler))
        .route("/boom", get(error_handler));
    ApiIngress::new(ApiIngressConfig::default())
        .apply_middleware(routes)
        .expect("middleware")
}

async fn echo_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({ "request_id": request_id }))
}

async fn error_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "request_id": request_id })),
    )
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = test_app()
        .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header_id.is_empty());

    // handlers see the same id that is echoed back
    let json = body_json(response).await;
    assert_eq!(json["request_id"], header_id);
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    assert_eq!(body_json(response).await["request_id"], "abc-123");
}

#[tokio::test]
async fn request_id_survives_error_responses() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/boom")
                .header("x-request-id", "error-test-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("error-test-123")
    );
}
