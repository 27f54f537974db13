use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by the session resolvers.
#[derive(Error, Debug)]
pub enum PokedexError {
    /// A record, category, or listing could not be fetched. Not retried.
    #[error("Could not fetch '{identifier}': {source}")]
    Fetch {
        identifier: String,
        #[source]
        source: ApiError,
    },

    /// Species metadata could not be fetched. Callers show degraded text.
    #[error("No description available for #{id}: {source}")]
    MissingDescription {
        id: u32,
        #[source]
        source: ApiError,
    },

    #[error("Category '{category}' has no members")]
    EmptyListing { category: String },

    #[error("Identifier is empty")]
    EmptyIdentifier,
}

impl PokedexError {
    /// The identifier that failed, if this error is tied to one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            PokedexError::Fetch { identifier, .. } => Some(identifier),
            PokedexError::EmptyListing { category } => Some(category),
            _ => None,
        }
    }

    /// Soft conditions degrade the display instead of failing the view.
    pub fn is_soft(&self) -> bool {
        matches!(self, PokedexError::MissingDescription { .. })
    }
}

pub type PokedexResult<T> = Result<T, PokedexError>;
