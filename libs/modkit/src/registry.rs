use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use utoipa::openapi::OpenApi;

use thiserror::Error;

use crate::context;
use crate::contracts;

pub struct ModuleEntry {
    pub name: &'static str,
    pub core: Arc<dyn contracts::Module>,
    pub rest: Option<Arc<dyn contracts::RestfulModule>>,
    pub rest_host: Option<Arc<dyn contracts::RestHostModule>>,
    pub db: Option<Arc<dyn contracts::DbModule>>,
}

impl std::fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("name", &self.name)
            .field("has_rest", &self.rest.is_some())
            .field("is_rest_host", &self.rest_host.is_some())
            .field("has_db", &self.db.is_some())
            .finish()
    }
}

/// The final runtime registry. Modules run in registration order.
pub struct ModuleRegistry {
    modules: Vec<ModuleEntry>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.modules.iter().map(|m| m.name).collect();
        f.debug_struct("ModuleRegistry")
            .field("modules", &names)
            .finish()
    }
}

impl ModuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    // ---- Ordered phases: init → DB → REST (sync) → serve ----

    pub async fn run_init_phase(&self, base_ctx: &context::ModuleCtx) -> Result<(), RegistryError> {
        for e in &self.modules {
            let ctx = base_ctx.clone().for_module(e.name);
            e.core
                .init(&ctx)
                .await
                .map_err(|source| RegistryError::Init {
                    module: e.name,
                    source,
                })?;
        }
        Ok(())
    }

    pub async fn run_db_phase(&self, db: &modkit_db::DbHandle) -> Result<(), RegistryError> {
        for e in &self.modules {
            if let Some(dbm) = &e.db {
                tracing::debug!(module = e.name, "running migrations");
                dbm.migrate(db)
                    .await
                    .map_err(|source| RegistryError::DbMigrate {
                        module: e.name,
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Compose the final router: host prepare → every REST module → host finalize.
    ///
    /// Returns `None` when no module exposes REST endpoints.
    pub fn run_rest_phase(
        &self,
        base_ctx: &context::ModuleCtx,
        mut router: Router,
    ) -> Result<Option<(Router, Arc<dyn contracts::RestHostModule>)>, RegistryError> {
        let hosts: Vec<_> = self
            .modules
            .iter()
            .filter(|e| e.rest_host.is_some())
            .collect();

        let host_entry = match hosts.as_slice() {
            [] => {
                return if self.modules.iter().any(|e| e.rest.is_some()) {
                    Err(RegistryError::RestRequiresHost)
                } else {
                    Ok(None)
                };
            }
            [one] => *one,
            _ => return Err(RegistryError::MultipleRestHosts),
        };
        let Some(host) = host_entry.rest_host.clone() else {
            return Err(RegistryError::RestRequiresHost);
        };
        let host_ctx = base_ctx.clone().for_module(host_entry.name);

        router = host
            .rest_prepare(&host_ctx, router)
            .map_err(|source| RegistryError::RestPrepare {
                module: host_entry.name,
                source,
            })?;

        let mut openapi = OpenApi::default();
        for e in &self.modules {
            if let Some(rest) = &e.rest {
                let ctx = base_ctx.clone().for_module(e.name);
                router = rest
                    .register_rest(&ctx, router, &mut openapi)
                    .map_err(|source| RegistryError::RestRegister {
                        module: e.name,
                        source,
                    })?;
            }
        }

        router = host
            .rest_finalize(&host_ctx, router, openapi)
            .map_err(|source| RegistryError::RestFinalize {
                module: host_entry.name,
                source,
            })?;

        Ok(Some((router, host)))
    }

    /// Serve the composed router until `cancel` fires.
    pub async fn run_serve_phase(
        &self,
        router: Router,
        host: Arc<dyn contracts::RestHostModule>,
        cancel: CancellationToken,
    ) -> Result<(), RegistryError> {
        host.serve(router, cancel)
            .await
            .map_err(|source| RegistryError::Serve { source })
    }
}

/// Collects modules in the order the binary registers them.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<ModuleEntry>,
}

impl RegistryBuilder {
    pub fn register(mut self, name: &'static str, core: Arc<dyn contracts::Module>) -> Self {
        self.entries.push(ModuleEntry {
            name,
            core,
            rest: None,
            rest_host: None,
            db: None,
        });
        self
    }

    /// Attach a DB capability to the most recently registered module.
    pub fn with_db(mut self, m: Arc<dyn contracts::DbModule>) -> Self {
        if let Some(last) = self.entries.last_mut() {
            last.db = Some(m);
        }
        self
    }

    /// Attach REST routes to the most recently registered module.
    pub fn with_rest(mut self, m: Arc<dyn contracts::RestfulModule>) -> Self {
        if let Some(last) = self.entries.last_mut() {
            last.rest = Some(m);
        }
        self
    }

    /// Mark the most recently registered module as the REST host.
    pub fn with_rest_host(mut self, m: Arc<dyn contracts::RestHostModule>) -> Self {
        if let Some(last) = self.entries.last_mut() {
            last.rest_host = Some(m);
        }
        self
    }

    pub fn build(self) -> Result<ModuleRegistry, RegistryError> {
        let mut seen = std::collections::HashSet::new();
        for e in &self.entries {
            if !seen.insert(e.name) {
                return Err(RegistryError::DuplicateModule(e.name));
            }
        }
        Ok(ModuleRegistry {
            modules: self.entries,
        })
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("module '{0}' registered twice")]
    DuplicateModule(&'static str),

    #[error("initialization failed for module '{module}'")]
    Init {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("database migration failed for module '{module}'")]
    DbMigrate {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("REST prepare failed for host module '{module}'")]
    RestPrepare {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("REST registration failed for module '{module}'")]
    RestRegister {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("REST finalize failed for host module '{module}'")]
    RestFinalize {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("REST phase requires an ingress host: modules with capability 'rest' found, but no module with capability 'rest_host'")]
    RestRequiresHost,

    #[error("multiple 'rest_host' modules detected; exactly one is allowed")]
    MultipleRestHosts,

    #[error("HTTP server failed")]
    Serve {
        #[source]
        source: anyhow::Error,
    },
}
