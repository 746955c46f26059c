//! Command handlers, one module per concern.

pub mod migrate;
pub mod pokemon;
pub mod serve;
