//! Persistent favorites list.
//!
//! Favorites are an ordered list of record names stored as a JSON array.
//! A missing or unreadable file is treated as an empty list.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Favorites file name in the data directory
const FAVORITES_FILE: &str = "favorites.json";

pub struct FavoritesStore {
    path: PathBuf,
    names: Vec<String>,
}

impl FavoritesStore {
    /// Open the favorites file inside `data_dir`
    pub fn open_in(data_dir: &Path) -> Self {
        Self::open(data_dir.join(FAVORITES_FILE))
    }

    pub fn open(path: PathBuf) -> Self {
        let names = Self::read(&path);
        debug!(path = %path.display(), count = names.len(), "Loaded favorites");
        Self { path, names }
    }

    fn read(path: &Path) -> Vec<String> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&contents) {
            Ok(names) => names,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unparsable favorites file, starting empty");
                Vec::new()
            }
        }
    }

    /// Save favorites to disk
    fn write(path: &Path, names: &[String]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create favorites directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string(names)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write favorites: {}", path.display()))?;
        Ok(())
    }

    /// Add `name` if absent, remove it if present, then save.
    /// Returns whether `name` is a favorite afterwards. The list is left
    /// unchanged when the save fails.
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        let mut names = self.names.clone();
        let now_favorite = match names.iter().position(|n| n == name) {
            Some(idx) => {
                names.remove(idx);
                false
            }
            None => {
                names.push(name.to_string());
                true
            }
        };
        Self::write(&self.path, &names)?;
        self.names = names;
        Ok(now_favorite)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

}
