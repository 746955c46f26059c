//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - PokemonStore / PokemonUnitOfWork: transactional storage for cached records
//! - PokemonSource: remote fetch of raw PokeAPI payloads
//!
//! These traits keep the cache coordinator independent of SQLite and HTTP.

pub mod pokemon_source;
pub mod pokemon_store;

pub use pokemon_source::{FetchError, PokemonSource};
pub use pokemon_store::{PokemonStore, PokemonUnitOfWork};
