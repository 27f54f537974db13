//! Interaction state: the current record, favorites, and command dispatch.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use dexcache_core::{next_id, previous_id, FavoritesStore, Pokedex, Pokemon};

use crate::commands::{Command, HELP};
use crate::render;

/// Maximum concurrent record lookups when listing favorites.
const MAX_CONCURRENT_REQUESTS: usize = 8;

/// Whether the session loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Viewer {
    dex: Arc<Pokedex>,
    favorites: FavoritesStore,
    current: Option<Arc<Pokemon>>,
}

impl Viewer {
    pub fn new(dex: Arc<Pokedex>, favorites: FavoritesStore) -> Self {
        Self {
            dex,
            favorites,
            current: None,
        }
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current.as_ref().map(|p| p.id)
    }

    /// Run one command, returning the text to print.
    pub async fn execute(&mut self, command: Command) -> (String, Flow) {
        debug!(?command, "Executing");
        let output = match command {
            Command::Show(identifier) => self.show(&identifier).await,
            Command::Random(tag) => {
                let result = self.dex.random_record(&tag).await;
                self.show_result(result).await
            }
            Command::Type(name) => match self.dex.pick_from_category(&name).await {
                Ok(pick) => self.show(&pick).await,
                Err(e) => {
                    warn!(category = %name, error = %e, "Could not load type");
                    render::TYPE_LOAD_FAILED.to_string()
                }
            },
            Command::Next(id) => match id.or(self.current_id()) {
                Some(current) => self.show(&next_id(current).to_string()).await,
                None => "No record selected.".to_string(),
            },
            Command::Prev(id) => match id.or(self.current_id()) {
                Some(current) => self.show(&previous_id(current).to_string()).await,
                None => "No record selected.".to_string(),
            },
            Command::List(tag) => match self.dex.names_for_generation(&tag).await {
                Ok(names) => names.join("\n"),
                Err(e) => {
                    warn!(error = %e, "Could not fetch name listing");
                    String::new()
                }
            },
            Command::Fav(name) => self.toggle_favorite(name),
            Command::Favs => self.list_favorites().await,
            Command::Stats => render::render_stats(self.dex.request_count(), &self.dex.cache_stats().await),
            Command::Help => HELP.to_string(),
            Command::Quit => return (String::new(), Flow::Quit),
        };
        (output, Flow::Continue)
    }

    async fn show(&mut self, identifier: &str) -> String {
        let result = self.dex.resolve_record(identifier).await;
        self.show_result(result).await
    }

    async fn show_result(&mut self, result: dexcache_core::PokedexResult<Arc<Pokemon>>) -> String {
        match result {
            Ok(record) => {
                let species = self.dex.describe(record.id).await;
                let card = render::render_card(&record, &species, self.favorites.contains(&record.name));
                self.current = Some(record);
                card
            }
            Err(e) => {
                warn!(error = %e, "Lookup failed");
                render::NOT_FOUND.to_string()
            }
        }
    }

    fn toggle_favorite(&mut self, name: Option<String>) -> String {
        let name = match name.or_else(|| self.current.as_ref().map(|p| p.name.clone())) {
            Some(n) => n.to_lowercase(),
            None => return "No record selected.".to_string(),
        };
        match self.favorites.toggle(&name) {
            Ok(true) => format!("♥ {} added to favorites", name),
            Ok(false) => format!("♡ {} removed from favorites", name),
            Err(e) => {
                warn!(name = %name, error = %format!("{:#}", e), "Could not save favorites");
                render::FAVORITES_SAVE_FAILED.to_string()
            }
        }
    }

    async fn list_favorites(&self) -> String {
        let dex = &self.dex;
        let entries: Vec<(String, Option<u32>)> = stream::iter(self.favorites.names().iter().cloned())
            .map(|name| async move {
                let id = dex.resolve_record(&name).await.ok().map(|p| p.id);
                (name, id)
            })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;
        render::render_favorites(&entries)
    }
}
