//! Core types and trait definitions for the Hearth lead store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod affiliate;
pub mod audit;
pub mod intent;
pub mod lead;
pub mod message;
pub mod session;
pub mod store;
