//! Domain layer for the dexcache service
//!
//! This module contains the canonical record model, the raw remote payload
//! model, domain errors and the port traits adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
