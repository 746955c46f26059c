//! Canonical Pokemon record model.
//!
//! A `Pokemon` is the normalized, stored representation of one PokeAPI
//! entity. Records are created on first successful fetch, overwritten in full
//! on a forced refresh, and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// A cached Pokemon as persisted in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Storage-assigned surrogate key.
    pub id: i64,
    /// PokeAPI identifier (the natural key, unique across the store).
    pub pokemon_id: i64,
    /// Lower-cased name.
    pub name: String,
    /// Height in metres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub base_experience: i64,
    /// Type names in slot order.
    pub types: Vec<String>,
    /// Ability names in slot order.
    pub abilities: Vec<String>,
    /// Stat name to base value, in payload order.
    pub stats: IndexMap<String, i64>,
    pub sprite_front: Option<String>,
    pub sprite_back: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pokemon {
    /// The normalized field values of this record, without storage metadata.
    pub fn fields(&self) -> NewPokemon {
        NewPokemon {
            pokemon_id: self.pokemon_id,
            name: self.name.clone(),
            height: self.height,
            weight: self.weight,
            base_experience: self.base_experience,
            types: self.types.clone(),
            abilities: self.abilities.clone(),
            stats: self.stats.clone(),
            sprite_front: self.sprite_front.clone(),
            sprite_back: self.sprite_back.clone(),
        }
    }
}

/// A normalized record that has not been stored yet.
///
/// Produced by the normalizer and handed to storage for insert or full
/// overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPokemon {
    pub pokemon_id: i64,
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub base_experience: i64,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: IndexMap<String, i64>,
    pub sprite_front: Option<String>,
    pub sprite_back: Option<String>,
}

impl NewPokemon {
    /// Create a record with only the identifying fields set.
    pub fn new(pokemon_id: i64, name: impl Into<String>) -> Self {
        Self {
            pokemon_id,
            name: name.into().to_lowercase(),
            height: 0.0,
            weight: 0.0,
            base_experience: 0,
            types: Vec::new(),
            abilities: Vec::new(),
            stats: IndexMap::new(),
            sprite_front: None,
            sprite_back: None,
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: i64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }
}
