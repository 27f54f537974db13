//! REST API client module for the public creature-data API.
//!
//! This module provides the `ApiClient` for fetching records, species
//! metadata, type listings, and the full name listing. The API is
//! unauthenticated JSON over HTTPS.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_BASE_URL, REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
