//! SeaORM entities.
//!
//! `users` only anchors ownership; identities come from the request resolver and
//! need not have a profile row, so the relation exists in the ORM only.

pub mod journal_entry;
pub mod user;
