//! Data models for creature API entities.
//!
//! This module contains the structures used to represent API data:
//!
//! - `Pokemon`: the full record (sprites, types, abilities, stats, moves)
//! - `SpeciesInfo`, `SpeciesSummary`: flavor text and genus metadata
//! - `CategoryListing`: members of an elemental type
//! - `NameListingResponse`: the full ordered name listing

pub mod category;
pub mod pokemon;
pub mod species;

pub use category::{CategoryListing, NameListingResponse, TypeResponse};
pub use pokemon::{AbilitySlot, MoveEntry, NamedResource, Pokemon, Sprites, StatEntry, TypeSlot};
pub use species::{FlavorTextEntry, GenusEntry, SpeciesInfo, SpeciesSummary};
