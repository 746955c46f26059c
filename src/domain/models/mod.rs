pub mod config;
pub mod page;
pub mod pokemon;
pub mod raw_pokemon;

pub use config::{
    Config, DatabaseConfig, LogFormat, LoggingConfig, PokeApiConfig, RotationPolicy, ServerConfig,
};
pub use page::{PageRequest, PokemonPage, MAX_PAGE_SIZE};
pub use pokemon::{NewPokemon, Pokemon};
pub use raw_pokemon::{
    NamedResource, RawAbilitySlot, RawPokemon, RawSprites, RawStat, RawTypeSlot,
};
