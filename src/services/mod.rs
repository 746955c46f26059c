//! Service layer: normalization and cache coordination.

pub mod normalizer;
pub mod pokemon_service;

pub use normalizer::normalize;
pub use pokemon_service::PokemonService;
