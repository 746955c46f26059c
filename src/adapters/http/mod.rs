//! HTTP presentation adapter.

pub mod pokemon_http;

pub use pokemon_http::{ErrorResponse, HealthResponse, PokemonHttpConfig, PokemonHttpServer};
