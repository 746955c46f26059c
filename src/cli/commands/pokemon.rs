use anyhow::{Context, Result};

use crate::cli::output::{print_json, TableFormatter};
use crate::domain::models::{PageRequest, Pokemon, PokemonPage};
use crate::domain::ports::{PokemonSource, PokemonStore};
use crate::services::PokemonService;

/// Handle get command
pub async fn handle_get<S: PokemonStore, F: PokemonSource>(
    service: &PokemonService<S, F>,
    pokemon_id: i64,
    json: bool,
) -> Result<()> {
    let pokemon = service
        .get_or_fetch(pokemon_id)
        .await
        .context("Failed to load pokemon")?
        .ok_or_else(|| {
            anyhow::anyhow!("Pokemon with ID {pokemon_id} not found in DB or PokeAPI")
        })?;

    show(&pokemon, json)
}

/// Handle fetch command
pub async fn handle_fetch<S: PokemonStore, F: PokemonSource>(
    service: &PokemonService<S, F>,
    pokemon_id: i64,
    json: bool,
) -> Result<()> {
    let pokemon = service
        .force_fetch_and_upsert(pokemon_id)
        .await
        .context("Failed to refresh pokemon")?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Pokemon with ID {pokemon_id} not found in PokeAPI, or an error occurred during fetching"
            )
        })?;

    show(&pokemon, json)
}

/// Handle list command
pub async fn handle_list<S: PokemonStore, F: PokemonSource>(
    service: &PokemonService<S, F>,
    page: u32,
    size: u32,
    json: bool,
) -> Result<()> {
    let request = PageRequest::new(page, size);
    request.validate()?;

    let (items, total) = service
        .list(request.offset(), request.limit())
        .await
        .context("Failed to list pokemon")?;
    let page = PokemonPage::new(items, total, request);

    if json {
        return print_json(&page);
    }

    if page.items.is_empty() {
        println!("No cached pokemon on page {} ({} cached in total).", page.page, page.total);
        return Ok(());
    }

    println!("{}", TableFormatter::new().format_pokemon_list(&page.items));
    println!(
        "\nPage {} (size {}): showing {} of {} cached",
        page.page,
        page.size,
        page.items.len(),
        page.total
    );
    Ok(())
}

/// Handle search command
pub async fn handle_search<S: PokemonStore, F: PokemonSource>(
    service: &PokemonService<S, F>,
    name: &str,
    json: bool,
) -> Result<()> {
    let pokemon = service
        .search_by_name(name)
        .await
        .context("Failed to search pokemon")?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Pokemon with name '{name}' not found in database. Try fetching it first if it exists in PokeAPI."
            )
        })?;

    show(&pokemon, json)
}

fn show(pokemon: &Pokemon, json: bool) -> Result<()> {
    if json {
        print_json(pokemon)
    } else {
        println!("{}", TableFormatter::new().format_pokemon_detail(pokemon));
        Ok(())
    }
}
