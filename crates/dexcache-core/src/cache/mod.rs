//! In-memory session caching.
//!
//! This module provides the `SessionCache` holding every record, species,
//! category, and name listing fetched during a session. Entries are never
//! evicted or mutated; the cache lives exactly as long as its session.
//!
//! `InflightGate` optionally coalesces concurrent fetches of the same key.

pub mod inflight;
pub mod store;

pub use inflight::{InflightGate, InflightPolicy};
pub use store::{CacheStats, CachedData, SessionCache};
