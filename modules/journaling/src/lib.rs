//! Journaling module: dated journal entries with mood/energy ratings,
//! filtered listing and per-user statistics.

// === PUBLIC CONTRACT ===
// Stable surface for other modules and the server binary
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{Journaling, MODULE_NAME};

// === INTERNAL MODULES ===
// Exposed for integration tests only; consumers should stick to `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
