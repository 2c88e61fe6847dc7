//! ModKit runtime runner.
//!
//! Supported DB modes:
//!   - `DbOptions::None`: modules get no DB in their contexts and the migration phase is skipped.
//!   - `DbOptions::Handle`: one shared `DbHandle` for every module.
//!
//! One stable `ModuleCtx` is built up front and reused across
//! init → db → rest → serve. Shutdown is driven by OS signals,
//! an external `CancellationToken`, or an arbitrary future.

use crate::context::{ConfigProvider, ModuleCtxBuilder};
use crate::registry::ModuleRegistry;
use crate::runtime::shutdown;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio_util::sync::CancellationToken;

/// How the runtime should provide a DB to modules.
pub enum DbOptions {
    /// No database integration. `ModuleCtx::db()` will be `None`.
    None,
    /// A single connected handle shared by every module.
    Handle(Arc<modkit_db::DbHandle>),
}

/// How the runtime should decide when to stop.
pub enum ShutdownOptions {
    /// Listen for OS signals (Ctrl+C / SIGTERM).
    Signals,
    /// An external `CancellationToken` controls the lifecycle.
    Token(CancellationToken),
    /// An arbitrary future; when it completes, we initiate shutdown.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

/// Options for running the ModKit runner.
pub struct RunOptions {
    /// Modules in the order they should be initialized.
    pub registry: ModuleRegistry,
    /// Provider of module config sections (raw JSON by module name).
    pub modules_cfg: Arc<dyn ConfigProvider>,
    pub db: DbOptions,
    pub shutdown: ShutdownOptions,
}

/// Full cycle: init → db → rest (sync) → serve until cancelled.
pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let cancel = match &opts.shutdown {
        ShutdownOptions::Token(t) => t.clone(),
        _ => CancellationToken::new(),
    };

    match opts.shutdown {
        ShutdownOptions::Signals => {
            let c = cancel.clone();
            tokio::spawn(async move {
                match shutdown::wait_for_shutdown().await {
                    Ok(()) => tracing::info!("shutdown: signal received"),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "shutdown: primary waiter failed; falling back to ctrl_c()"
                        );
                        let _ = tokio::signal::ctrl_c().await;
                    }
                }
                c.cancel();
            });
        }
        ShutdownOptions::Future(waiter) => {
            let c = cancel.clone();
            tokio::spawn(async move {
                waiter.await;
                tracing::info!("shutdown: external future completed");
                c.cancel();
            });
        }
        ShutdownOptions::Token(_) => {
            tracing::info!("shutdown: external token will control lifecycle");
        }
    }

    let registry = opts.registry;

    let mut ctx_builder =
        ModuleCtxBuilder::new(cancel.clone()).with_config_provider(opts.modules_cfg.clone());
    if let DbOptions::Handle(ref db) = opts.db {
        ctx_builder = ctx_builder.with_db(db.clone());
    }
    let base_ctx = ctx_builder.build();

    tracing::info!("Phase: init");
    registry.run_init_phase(&base_ctx).await?;

    match &opts.db {
        DbOptions::Handle(db) => {
            tracing::info!(engine = ?db.engine(), "Phase: db");
            registry.run_db_phase(db).await?;
        }
        DbOptions::None => tracing::info!("Phase: db (skipped, no database)"),
    }

    tracing::info!("Phase: rest (sync)");
    match registry.run_rest_phase(&base_ctx, axum::Router::new())? {
        Some((router, host)) => {
            tracing::info!("Phase: serve");
            registry.run_serve_phase(router, host, cancel.clone()).await?;
        }
        None => {
            tracing::info!("no REST host registered; waiting for shutdown");
            cancel.cancelled().await;
        }
    }

    if let DbOptions::Handle(db) = opts.db {
        db.close().await;
    }
    tracing::info!("Phase: stopped");
    Ok(())
}
