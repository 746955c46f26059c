//! Adapters for external systems.

pub mod http;
pub mod pokeapi;
pub mod sqlite;
