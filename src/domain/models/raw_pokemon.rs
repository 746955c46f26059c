//! Raw PokeAPI payload model.
//!
//! Mirrors the subset of the `/pokemon/{id}` response body that the
//! normalizer reads. Every top-level field is optional so that a sparse body
//! still deserializes; missing values are defaulted during normalization.

use serde::{Deserialize, Serialize};

/// The `/pokemon/{id}` response body as returned by the remote source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPokemon {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Decimetres.
    #[serde(default)]
    pub height: Option<f64>,
    /// Hectograms.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub base_experience: Option<i64>,
    #[serde(default)]
    pub types: Vec<RawTypeSlot>,
    #[serde(default)]
    pub abilities: Vec<RawAbilitySlot>,
    #[serde(default)]
    pub stats: Vec<RawStat>,
    #[serde(default)]
    pub sprites: Option<RawSprites>,
}

/// A `{name, url}` reference as used throughout PokeAPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl NamedResource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTypeSlot {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAbilitySlot {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(default)]
    pub is_hidden: bool,
    pub ability: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStat {
    pub base_stat: i64,
    #[serde(default)]
    pub effort: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
}
