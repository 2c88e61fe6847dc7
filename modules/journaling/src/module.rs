use std::sync::Arc;

use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::JournalingConfig;
use crate::contract::client::JournalingApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::JournalingLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmJournalRepository;

pub const MODULE_NAME: &str = "journaling";

/// Journaling module: wires config, repository and service; serves the REST routes.
#[derive(Default)]
pub struct Journaling {
    // read-mostly; stored once during init
    service: arc_swap::ArcSwapOption<Service>,
}

impl Journaling {
    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("journaling service not initialized"))
    }

    /// In-process client for other modules; available after `init`.
    pub fn client(&self) -> anyhow::Result<Arc<dyn JournalingApi>> {
        Ok(Arc::new(JournalingLocalClient::new(self.service()?)))
    }
}

#[async_trait]
impl Module for Journaling {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing journaling module");

        let cfg: JournalingConfig = ctx.module_config()?;
        debug!(
            "Loaded journaling config: default_page_size={}, max_page_size={}, trend_window_days={}",
            cfg.default_page_size, cfg.max_page_size, cfg.trend_window_days
        );
        if cfg.default_page_size == 0 || cfg.default_page_size > cfg.max_page_size {
            anyhow::bail!(
                "journaling: default_page_size ({}) must be between 1 and max_page_size ({})",
                cfg.default_page_size,
                cfg.max_page_size
            );
        }

        let db = ctx.db().ok_or_else(|| anyhow::anyhow!("DB required"))?;
        let repo = SeaOrmJournalRepository::new(db.sea());
        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            max_title_length: cfg.max_title_length,
            max_tags_length: cfg.max_tags_length,
            trend_window_days: cfg.trend_window_days,
        };
        let service = Service::new(Arc::new(repo), service_config);

        self.service.store(Some(Arc::new(service)));
        info!("Journaling service ready");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[async_trait]
impl DbModule for Journaling {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()> {
        info!("Running journaling database migrations");
        Migrator::up(&db.sea(), None).await?;
        info!("Journaling database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Journaling {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &mut utoipa::openapi::OpenApi,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering journaling REST routes");
        let router = routes::register_routes(router, openapi, self.service()?)?;
        info!("Journaling REST routes registered successfully");
        Ok(router)
    }
}
