//! Raw payload to canonical record normalization.
//!
//! Pure transformation with no I/O. PokeAPI reports height in decimetres and
//! weight in hectograms; canonical records use metres and kilograms.

use indexmap::IndexMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewPokemon, RawPokemon};

/// Name stored when the payload carries none.
pub const PLACEHOLDER_NAME: &str = "unknown";

/// Divisor converting decimetres to metres and hectograms to kilograms.
const UNIT_DIVISOR: f64 = 10.0;

/// Normalize a raw payload into a canonical record.
///
/// # Errors
/// Returns `DomainError::MalformedPayload` if the payload has no `id`.
pub fn normalize(raw: RawPokemon) -> DomainResult<NewPokemon> {
    let pokemon_id = raw
        .id
        .ok_or_else(|| DomainError::MalformedPayload("payload has no id".to_string()))?;

    let name = raw
        .name
        .as_deref()
        .unwrap_or(PLACEHOLDER_NAME)
        .to_lowercase();

    let types = raw.types.into_iter().map(|slot| slot.kind.name).collect();
    let abilities = raw
        .abilities
        .into_iter()
        .map(|slot| slot.ability.name)
        .collect();

    // A later duplicate overwrites the value but keeps the first position.
    let stats: IndexMap<String, i64> = raw
        .stats
        .into_iter()
        .map(|entry| (entry.stat.name, entry.base_stat))
        .collect();

    let sprites = raw.sprites.unwrap_or_default();

    Ok(NewPokemon {
        pokemon_id,
        name,
        height: raw.height.unwrap_or(0.0) / UNIT_DIVISOR,
        weight: raw.weight.unwrap_or(0.0) / UNIT_DIVISOR,
        base_experience: raw.base_experience.unwrap_or(0),
        types,
        abilities,
        stats,
        sprite_front: sprites.front_default,
        sprite_back: sprites.back_default,
    })
}
