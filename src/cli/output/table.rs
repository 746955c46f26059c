//! Table output formatting for CLI commands
//!
//! Renders cached Pokemon as comfy-table tables: a compact row-per-record
//! listing and a two-column detail view for a single record.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::Pokemon;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format a page of Pokemon as a table
    pub fn format_pokemon_list(&self, pokemon: &[Pokemon]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            header("ID"),
            header("Name"),
            header("Types"),
            header("Height (m)"),
            header("Weight (kg)"),
            header("Base XP"),
        ]);

        for p in pokemon {
            table.add_row(vec![
                Cell::new(p.pokemon_id),
                self.name_cell(&p.name),
                Cell::new(p.types.join(", ")),
                Cell::new(format!("{:.1}", p.height)),
                Cell::new(format!("{:.1}", p.weight)),
                Cell::new(p.base_experience),
            ]);
        }

        table.to_string()
    }

    /// Format a single Pokemon as a field/value table
    pub fn format_pokemon_detail(&self, pokemon: &Pokemon) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("Field"), header("Value")]);

        let stats = pokemon
            .stats
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![Cell::new("ID"), Cell::new(pokemon.pokemon_id)]);
        table.add_row(vec![Cell::new("Name"), self.name_cell(&pokemon.name)]);
        table.add_row(vec![Cell::new("Types"), Cell::new(pokemon.types.join(", "))]);
        table.add_row(vec![Cell::new("Abilities"), Cell::new(pokemon.abilities.join(", "))]);
        table.add_row(vec![Cell::new("Height (m)"), Cell::new(format!("{:.1}", pokemon.height))]);
        table.add_row(vec![Cell::new("Weight (kg)"), Cell::new(format!("{:.1}", pokemon.weight))]);
        table.add_row(vec![Cell::new("Base XP"), Cell::new(pokemon.base_experience)]);
        table.add_row(vec![Cell::new("Stats"), Cell::new(stats)]);
        table.add_row(vec![
            Cell::new("Sprite"),
            Cell::new(pokemon.sprite_front.as_deref().unwrap_or("-")),
        ]);
        table.add_row(vec![
            Cell::new("Cached at"),
            Cell::new(pokemon.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ]);
        table.add_row(vec![
            Cell::new("Refreshed at"),
            Cell::new(pokemon.updated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ]);

        table.to_string()
    }

    fn name_cell(&self, name: &str) -> Cell {
        if self.use_colors {
            Cell::new(name).fg(Color::Cyan)
        } else {
            Cell::new(name)
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}
