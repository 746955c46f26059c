use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use dexcache::domain::models::RawPokemon;
use dexcache::domain::ports::{FetchError, PokemonSource};

/// In-memory `PokemonSource` with scripted responses and a call counter.
///
/// Ids without a scripted response answer `NotFound`. Ids given a delay
/// answer only after sleeping for it.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<i64, Result<RawPokemon, FetchError>>>,
    delays: Mutex<HashMap<i64, Duration>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(self, pokemon_id: i64, payload: Value) -> Self {
        self.set_payload(pokemon_id, payload);
        self
    }

    pub fn with_error(self, pokemon_id: i64, error: FetchError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(pokemon_id, Err(error));
        self
    }

    pub fn with_delay(self, pokemon_id: i64, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(pokemon_id, delay);
        self
    }

    /// Replace the payload served for `pokemon_id`.
    pub fn set_payload(&self, pokemon_id: i64, payload: Value) {
        let raw: RawPokemon = serde_json::from_value(payload).expect("payload must deserialize");
        self.responses
            .lock()
            .unwrap()
            .insert(pokemon_id, Ok(raw));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PokemonSource for FakeSource {
    async fn fetch(&self, pokemon_id: i64) -> Result<RawPokemon, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&pokemon_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .get(&pokemon_id)
            .cloned()
            .unwrap_or(Err(FetchError::NotFound(pokemon_id)))
    }
}

/// A PokeAPI-shaped payload in raw units (decimetres, hectograms).
pub fn pokemon_payload(pokemon_id: i64, name: &str) -> Value {
    json!({
        "id": pokemon_id,
        "name": name,
        "height": 7,
        "weight": 69,
        "base_experience": 64,
        "types": [
            {"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}},
            {"slot": 2, "type": {"name": "poison", "url": "https://pokeapi.co/api/v2/type/4/"}}
        ],
        "abilities": [
            {"slot": 1, "is_hidden": false, "ability": {"name": "overgrow"}},
            {"slot": 3, "is_hidden": true, "ability": {"name": "chlorophyll"}}
        ],
        "stats": [
            {"base_stat": 45, "effort": 0, "stat": {"name": "hp"}},
            {"base_stat": 49, "effort": 0, "stat": {"name": "attack"}}
        ],
        "sprites": {
            "front_default": format!("https://img.example/{pokemon_id}.png"),
            "back_default": null
        }
    })
}
