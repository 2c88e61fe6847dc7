use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

#[derive(Clone)]
pub struct ModuleCtx {
    pub(crate) db: Option<Arc<modkit_db::DbHandle>>,
    pub(crate) config_provider: Option<Arc<dyn ConfigProvider>>,
    pub(crate) cancellation_token: CancellationToken,
    pub(crate) module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                db: None,
                config_provider: None,
                cancellation_token: token,
                module_name: None,
            },
        }
    }

    pub fn with_db(mut self, db: Arc<modkit_db::DbHandle>) -> Self {
        self.inner.db = Some(db);
        self
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name (used by the registry).
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    pub fn db(&self) -> Option<Arc<modkit_db::DbHandle>> {
        self.db.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Deserialize the module's config section into `T`.
    ///
    /// A missing section (or an unscoped context) yields `T::default()`; a section
    /// that is present but does not decode is an error naming the module.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let (Some(name), Some(provider)) = (&self.module_name, &self.config_provider) else {
            return Ok(T::default());
        };
        match provider.get_module_config(name) {
            Some(val) => serde_json::from_value(val.clone())
                .map_err(|e| anyhow::anyhow!("invalid {name} config: {e}")),
            None => Ok(T::default()),
        }
    }
}
