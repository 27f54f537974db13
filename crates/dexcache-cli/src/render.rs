//! Plain-text rendering of records and session diagnostics.

use std::fmt::Write;

use dexcache_core::models::{Pokemon, SpeciesSummary};
use dexcache_core::utils::{capitalize, stat_bar};
use dexcache_core::CacheStats;

/// Width of the stat bars in characters.
const STAT_BAR_WIDTH: usize = 24;

/// Width of the stat name column.
const STAT_NAME_WIDTH: usize = 16;

pub const NOT_FOUND: &str = "Pokémon not found.\nCould not load data — check name or id.";

pub const TYPE_LOAD_FAILED: &str = "Could not load type data.";

pub const FAVORITES_SAVE_FAILED: &str = "Could not save favorites.";

pub const NO_FAVORITES: &str = "No favorites yet";

/// Render a record card with its species description.
pub fn render_card(p: &Pokemon, species: &SpeciesSummary, favorite: bool) -> String {
    let mut out = String::new();
    let marker = if favorite { "♥ Favorited" } else { "♡ Favorite" };
    let _ = writeln!(out, "{}  #{}  [{}]", capitalize(&p.name), p.id, marker);

    match p.image_url() {
        Some(url) => {
            let _ = writeln!(out, "Image: {}", url);
        }
        None => out.push_str("No image\n"),
    }

    let types: Vec<String> = p.type_names().into_iter().map(capitalize).collect();
    let _ = writeln!(out, "Types: {}", types.join(", "));
    let _ = writeln!(out, "Abilities: {}", p.ability_labels().join(", "));

    out.push_str("Stats:\n");
    for s in &p.stats {
        let _ = writeln!(
            out,
            "  {:<width$}{} {}",
            s.stat.name,
            stat_bar(s.bar_fraction(), STAT_BAR_WIDTH),
            s.base_stat,
            width = STAT_NAME_WIDTH
        );
    }

    let moves: Vec<&str> = p.displayed_moves().collect();
    let _ = writeln!(out, "Moves: {}", moves.join(", "));
    out.push('\n');
    out.push_str(&species.display_text());
    out.push('\n');
    out
}

/// One line per favorite: resolved ones with id, unresolved ones by name.
pub fn render_favorites(entries: &[(String, Option<u32>)]) -> String {
    if entries.is_empty() {
        return NO_FAVORITES.to_string();
    }
    entries
        .iter()
        .map(|(name, id)| match id {
            Some(id) => format!("#{:<5} {}", id, capitalize(name)),
            None => format!("#?     {}", capitalize(name)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(requests: u64, stats: &CacheStats) -> String {
    format!(
        "Requests: {}\nRecords: {} ({} keys)\nSpecies: {}\nCategories: {}\nName listing: {}\nOldest entry: {}",
        requests,
        stats.records,
        stats.record_keys,
        stats.species,
        stats.categories,
        if stats.listing_loaded { "loaded" } else { "not loaded" },
        stats.oldest_age_display()
    )
}
