//! dexcache core library.
//!
//! Fetch-and-cache layer for the public creature-data API:
//!
//! - `api`: HTTP client and transport errors
//! - `cache`: session-scoped stores and optional fetch coalescing
//! - `session`: the `Pokedex` resolvers built on top of both
//! - `random`, `navigation`: id and member selection
//! - `favorites`, `config`: persistent user state

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod navigation;
pub mod random;
pub mod session;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use cache::{CacheStats, InflightPolicy};
pub use config::Config;
pub use error::{PokedexError, PokedexResult};
pub use favorites::FavoritesStore;
pub use models::{CategoryListing, Pokemon, SpeciesInfo, SpeciesSummary};
pub use navigation::{next_id, previous_id};
pub use random::{pick_random_identifier, pick_random_member, GenerationRange};
pub use session::Pokedex;
