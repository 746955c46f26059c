//! PokeAPI remote source adapter.
//!
//! Fetches raw `/pokemon/{id}` payloads over HTTPS with a client-level
//! timeout and a token-bucket rate limiter.

pub mod client;

pub use client::{PokeApiClient, PokeApiClientError};
