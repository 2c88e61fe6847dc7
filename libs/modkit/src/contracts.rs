use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;
use utoipa::openapi::OpenApi;

/// Core module: DI/wiring; do not rely on migrated schema here.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    async fn init(&self, ctx: &crate::context::ModuleCtx) -> anyhow::Result<()>;
    fn as_any(&self) -> &dyn std::any::Any;
}

#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs AFTER init, BEFORE REST/serve.
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
///
/// Modules merge the OpenAPI description of their operations into `openapi`.
pub trait RestfulModule: Send + Sync {
    fn register_rest(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
        openapi: &mut OpenApi,
    ) -> anyhow::Result<Router>;
}

/// REST host module: owns the HTTP listener and the global middleware stack.
#[async_trait]
pub trait RestHostModule: Send + Sync + 'static {
    /// Prepare a base Router (host-level endpoints). Do NOT start the server here.
    fn rest_prepare(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
    ) -> anyhow::Result<Router>;

    /// Finalize before serving: attach `/openapi.json` and the middleware stack.
    fn rest_finalize(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
        openapi: OpenApi,
    ) -> anyhow::Result<Router>;

    /// Serve `router` until `cancel` fires.
    async fn serve(&self, router: Router, cancel: CancellationToken) -> anyhow::Result<()>;
}
