//! API ingress: the single REST host.
//!
//! Owns the listener, host-level endpoints (`/`, `/health`, `/openapi.json`)
//! and the global middleware stack every module route runs behind.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::http::{header, HeaderName};
use axum::response::IntoResponse;
use axum::{middleware::from_fn, routing::get, Extension, Json, Router};
use modkit::security::{HeaderIdentityResolver, IdentityResolver};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod openapi;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub const MODULE_NAME: &str = "api_ingress";

pub struct ApiIngress {
    // read-mostly; swapped once during init
    config: ArcSwap<ApiIngressConfig>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    fn identity_resolver(cfg: &ApiIngressConfig) -> Result<Arc<dyn IdentityResolver>> {
        let name = HeaderName::from_bytes(cfg.identity_header.as_bytes())
            .with_context(|| format!("invalid identity_header '{}'", cfg.identity_header))?;
        Ok(Arc::new(HeaderIdentityResolver::new(name)))
    }

    /// Wrap `router` in the global middleware stack.
    ///
    /// Outermost first: set request id → trace span → request id and identity
    /// resolver into extensions → propagate request id → timeout → CORS → body limit.
    /// `Router::layer` wraps what is already there, so layers are added innermost first.
    pub fn apply_middleware(&self, mut router: Router) -> Result<Router> {
        let cfg = self.get_config();
        let x_request_id = request_id::header();
        let resolver = Self::identity_resolver(&cfg)?;

        router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router
            .layer(TimeoutLayer::new(Duration::from_secs(cfg.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(Extension(resolver))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> anyhow::Result<()> {
        let cfg = ctx.module_config::<ApiIngressConfig>()?;
        // fail at startup rather than on the first request
        Self::identity_resolver(&cfg)?;
        tracing::debug!(
            bind_addr = %cfg.bind_addr,
            cors = cfg.cors_enabled,
            docs = cfg.enable_docs,
            "api_ingress configured"
        );
        self.config.store(Arc::new(cfg));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[async_trait]
impl modkit::contracts::RestHostModule for ApiIngress {
    fn rest_prepare(&self, _ctx: &modkit::ModuleCtx, router: Router) -> anyhow::Result<Router> {
        let docs = self.get_config().enable_docs;
        let router = router
            .route("/health", get(web::health_check))
            .route(
                "/",
                get(move || async move { Json(web::service_info(docs)) }),
            );
        tracing::debug!("REST host prepared base router");
        Ok(router)
    }

    fn rest_finalize(
        &self,
        _ctx: &modkit::ModuleCtx,
        mut router: Router,
        openapi: OpenApi,
    ) -> anyhow::Result<Router> {
        if self.get_config().enable_docs {
            let doc = openapi::finalize_document(openapi);
            tracing::info!(paths = doc.paths.paths.len(), "serving OpenAPI document");
            let doc = Arc::new(serde_json::to_value(&doc)?);
            router = router.route(
                "/openapi.json",
                get(move || {
                    let doc = doc.clone();
                    async move {
                        ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone()))
                            .into_response()
                    }
                }),
            );
        }

        let router = router.fallback(web::route_not_found);
        self.apply_middleware(router)
    }

    async fn serve(&self, router: Router, cancel: CancellationToken) -> anyhow::Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identity_header_is_rejected() {
        let cfg = ApiIngressConfig {
            identity_header: "bad header".into(),
            ..Default::default()
        };
        assert!(ApiIngress::new(cfg).apply_middleware(Router::new()).is_err());
    }

    #[tokio::test]
    async fn init_reads_module_section() {
        use std::collections::HashMap;

        struct Bag(HashMap<String, serde_json::Value>);
        impl modkit::ConfigProvider for Bag {
            fn get_module_config(&self, name: &str) -> Option<&serde_json::Value> {
                self.0.get(name)
            }
        }

        let mut bag = HashMap::new();
        bag.insert(
            MODULE_NAME.to_string(),
            serde_json::json!({ "bind_addr": "0.0.0.0:9999", "cors_enabled": false }),
        );
        let ctx = modkit::ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(Bag(bag)))
            .build()
            .for_module(MODULE_NAME);

        let ingress = ApiIngress::default();
        modkit::Module::init(&ingress, &ctx).await.unwrap();
        let cfg = ingress.get_config();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9999");
        assert!(!cfg.cors_enabled);
    }
}
