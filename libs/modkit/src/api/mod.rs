//! Shared REST building blocks.

pub mod problem;
