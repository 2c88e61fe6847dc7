use axum::http::{HeaderName, Request};
use axum::{body::Body, middleware::Next, response::Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

/// Request id made available to handlers through `Extension<XRequestId>`.
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

fn request_id_of<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a")
}

/// Generates ids for requests that arrive without `x-request-id`.
#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Stores the request id in extensions and records it on the request span.
pub async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = request_id_of(&req).to_owned();
    tracing::Span::current().record("request_id", tracing::field::display(&rid));
    req.extensions_mut().insert(XRequestId(rid));
    next.run(req).await
}

/// One `http_request` span per request; completion is logged with status and latency.
#[allow(clippy::type_complexity)]
pub fn create_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> tracing::Span + Clone,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                path = %req.uri().path(),
                version = ?req.version(),
                request_id = %request_id_of(req),
            )
        })
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
