//! Random selection by generation range and from category listings.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{PokedexError, PokedexResult};
use crate::models::CategoryListing;

/// Inclusive range of record ids for one generation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRange {
    pub start: u32,
    pub end: u32,
}

/// Tag of the catch-all range.
pub const ALL_GENERATIONS: &str = "all";

const GENERATION_RANGES: &[(&str, GenerationRange)] = &[
    ("1", GenerationRange { start: 1, end: 151 }),
    ("2", GenerationRange { start: 152, end: 251 }),
    ("3", GenerationRange { start: 252, end: 386 }),
    (ALL_GENERATIONS, GenerationRange::ALL),
];

impl GenerationRange {
    pub const ALL: GenerationRange = GenerationRange { start: 1, end: 2000 };

    /// Look up a tag exactly; `None` for unknown tags.
    pub fn lookup(tag: &str) -> Option<Self> {
        GENERATION_RANGES
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, r)| *r)
    }

    /// Look up a tag, falling back to the catch-all range.
    pub fn for_tag(tag: &str) -> Self {
        Self::lookup(tag).unwrap_or(Self::ALL)
    }

    pub fn contains(&self, id: u32) -> bool {
        (self.start..=self.end).contains(&id)
    }

    /// Known tags, in display order.
    pub fn tags() -> impl Iterator<Item = &'static str> {
        GENERATION_RANGES.iter().map(|(t, _)| *t)
    }
}

/// Uniformly pick an id within the range selected by `range_tag`.
pub fn pick_random_identifier<R: Rng + ?Sized>(range_tag: &str, rng: &mut R) -> u32 {
    let range = GenerationRange::for_tag(range_tag);
    rng.gen_range(range.start..=range.end)
}

/// Uniformly pick one member of `listing`.
pub fn pick_random_member<'a, R: Rng + ?Sized>(
    listing: &'a CategoryListing,
    rng: &mut R,
) -> PokedexResult<&'a str> {
    listing
        .members
        .choose(rng)
        .map(String::as_str)
        .ok_or_else(|| PokedexError::EmptyListing {
            category: listing.name.clone(),
        })
}
