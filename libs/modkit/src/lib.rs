//! # ModKit - Module Toolkit
//!
//! Small toolkit shared by the server binary and its modules.
//!
//! ## Features
//!
//! - **Contracts**: `Module`, `DbModule`, `RestfulModule`, `RestHostModule`
//! - **Explicit registry**: modules are registered by the binary in a fixed order
//! - **Phase-based lifecycle**: init → DB → REST → serve → stop
//! - **Problem Details**: RFC 9457 error responses shared by all REST layers
//! - **Security context**: pluggable request identity resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use modkit::{ModuleRegistry, RunOptions};
//!
//! let registry = ModuleRegistry::builder()
//!     .register("journaling", journaling.clone())
//!     .with_db(journaling.clone())
//!     .with_rest(journaling)
//!     .build();
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

// Module system exports
pub mod context;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};

pub mod contracts;
pub use contracts::*;

pub mod registry;
pub use registry::{ModuleRegistry, RegistryError};

// REST helpers
pub mod api;
pub use api::problem::{
    bad_request, internal_error, not_found, unauthorized, Problem, ProblemResponse, ValidationError,
};

pub mod security;
pub use security::{AuthError, HeaderIdentityResolver, IdentityResolver, SecurityCtx};

pub mod runtime;
pub use runtime::{run, DbOptions, RunOptions, ShutdownOptions};
