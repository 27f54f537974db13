//! The `Pokedex` session: cache-or-fetch resolution over the API client.
//!
//! A session owns its caches and request counter; build one per run and drop
//! it on teardown. Share it across tasks behind an `Arc`.

use std::sync::Arc;

use rand::thread_rng;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheStats, InflightGate, InflightPolicy, SessionCache};
use crate::config::{Config, DEFAULT_LISTING_LIMIT};
use crate::error::{PokedexError, PokedexResult};
use crate::models::{CategoryListing, Pokemon, SpeciesInfo, SpeciesSummary};
use crate::random::{pick_random_identifier, pick_random_member, GenerationRange};
use crate::utils::normalize_identifier;

pub struct Pokedex {
    client: ApiClient,
    cache: SessionCache,
    records_inflight: InflightGate<String>,
    species_inflight: InflightGate<u32>,
    categories_inflight: InflightGate<String>,
    listing_inflight: InflightGate<()>,
    listing_limit: u32,
}

impl Pokedex {
    /// Session with uncoalesced fetches and the default listing limit
    pub fn new(client: ApiClient) -> Self {
        Self::with_policy(client, InflightPolicy::default())
    }

    pub fn with_policy(client: ApiClient, policy: InflightPolicy) -> Self {
        Self {
            client,
            cache: SessionCache::new(),
            records_inflight: InflightGate::new(policy),
            species_inflight: InflightGate::new(policy),
            categories_inflight: InflightGate::new(policy),
            listing_inflight: InflightGate::new(policy),
            listing_limit: DEFAULT_LISTING_LIMIT,
        }
    }

    /// Build a session from configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = ApiClient::with_base_url(config.api_base_url(), config.request_timeout())?;
        let mut pokedex = Self::with_policy(client, config.inflight_policy);
        pokedex.listing_limit = config.listing_limit();
        Ok(pokedex)
    }

    pub fn inflight_policy(&self) -> InflightPolicy {
        self.records_inflight.policy()
    }

    /// Network requests issued by this session
    pub fn request_count(&self) -> u64 {
        self.client.request_count()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    // ===== Records =====

    /// Resolve a record by numeric id or name (case-insensitive).
    ///
    /// Cache hits never touch the network. A miss issues one request and, on
    /// success, caches the record under the requested key, its id, and its
    /// lowercased name. Failures are returned as-is and cache nothing.
    pub async fn resolve_record(&self, identifier: &str) -> PokedexResult<Arc<Pokemon>> {
        let key = normalize_identifier(identifier);
        if key.is_empty() {
            return Err(PokedexError::EmptyIdentifier);
        }

        if let Some(hit) = self.cache.record(&key).await {
            debug!(key = %key, "Record cache hit");
            return Ok(hit);
        }

        let permit = self.records_inflight.enter(&key).await;
        let result = match self.cache.record(&key).await {
            Some(hit) => {
                debug!(key = %key, "Record cached while waiting");
                Ok(hit)
            }
            None => match self.client.fetch_pokemon(&key).await {
                Ok(record) => {
                    info!(key = %key, id = record.id, requests = self.request_count(), "Fetched record");
                    Ok(self.cache.insert_record(&key, record).await)
                }
                Err(source) => {
                    warn!(key = %key, error = %source, "Record fetch failed");
                    Err(PokedexError::Fetch {
                        identifier: key.clone(),
                        source,
                    })
                }
            },
        };
        drop(permit);
        result
    }

    /// Resolve a uniformly random record id within a generation range.
    pub async fn random_record(&self, range_tag: &str) -> PokedexResult<Arc<Pokemon>> {
        let id = pick_random_identifier(range_tag, &mut thread_rng());
        debug!(range_tag, id, "Picked random id");
        self.resolve_record(&id.to_string()).await
    }

    // ===== Species =====

    /// Resolve species metadata by id. Failure is a soft condition;
    /// see [`Pokedex::describe`].
    pub async fn resolve_species(&self, id: u32) -> PokedexResult<Arc<SpeciesInfo>> {
        if let Some(hit) = self.cache.species(id).await {
            debug!(id, "Species cache hit");
            return Ok(hit);
        }

        let permit = self.species_inflight.enter(&id).await;
        let result = match self.cache.species(id).await {
            Some(hit) => Ok(hit),
            None => match self.client.fetch_species(id).await {
                Ok(info) => {
                    debug!(id, requests = self.request_count(), "Fetched species");
                    Ok(self.cache.insert_species(id, info).await)
                }
                Err(source) => Err(PokedexError::MissingDescription { id, source }),
            },
        };
        drop(permit);
        result
    }

    /// Display-ready species description; degrades instead of failing.
    pub async fn describe(&self, id: u32) -> SpeciesSummary {
        match self.resolve_species(id).await {
            Ok(info) => SpeciesSummary::from_species(&info),
            Err(e) => {
                warn!(id, error = %e, "Species unavailable");
                SpeciesSummary::unavailable()
            }
        }
    }

    // ===== Categories =====

    /// Resolve a category listing, keyed by `name` exactly as given.
    pub async fn resolve_category(&self, name: &str) -> PokedexResult<Arc<CategoryListing>> {
        if name.is_empty() {
            return Err(PokedexError::EmptyIdentifier);
        }

        if let Some(hit) = self.cache.category(name).await {
            debug!(category = name, "Category cache hit");
            return Ok(hit);
        }

        let key = name.to_string();
        let permit = self.categories_inflight.enter(&key).await;
        let result = match self.cache.category(name).await {
            Some(hit) => Ok(hit),
            None => match self.client.fetch_type(name).await {
                Ok(response) => {
                    let listing = CategoryListing::from_response(name, response);
                    info!(category = name, members = listing.len(), "Fetched category");
                    Ok(self.cache.insert_category(listing).await)
                }
                Err(source) => {
                    warn!(category = name, error = %source, "Category fetch failed");
                    Err(PokedexError::Fetch {
                        identifier: key.clone(),
                        source,
                    })
                }
            },
        };
        drop(permit);
        result
    }

    /// Resolve a random member of a category.
    pub async fn random_from_category(&self, name: &str) -> PokedexResult<Arc<Pokemon>> {
        let pick = self.pick_from_category(name).await?;
        self.resolve_record(&pick).await
    }

    /// Name of a random member of category `name`, without resolving its record.
    pub async fn pick_from_category(&self, name: &str) -> PokedexResult<String> {
        let listing = self.resolve_category(name).await?;
        let pick = pick_random_member(&listing, &mut thread_rng())?.to_string();
        debug!(category = name, pick = %pick, "Picked random category member");
        Ok(pick)
    }

    // ===== Name listing =====

    /// The full ordered name listing, fetched once per session.
    pub async fn resolve_listing(&self) -> PokedexResult<Arc<Vec<String>>> {
        if let Some(hit) = self.cache.listing().await {
            return Ok(hit);
        }

        let permit = self.listing_inflight.enter(&()).await;
        let result = match self.cache.listing().await {
            Some(hit) => Ok(hit),
            None => match self.client.fetch_name_listing(self.listing_limit).await {
                Ok(response) => {
                    let names = response.into_names();
                    info!(count = names.len(), "Fetched name listing");
                    Ok(self.cache.insert_listing(names).await)
                }
                Err(source) => {
                    warn!(error = %source, "Name listing fetch failed");
                    Err(PokedexError::Fetch {
                        identifier: format!("listing (limit {})", self.listing_limit),
                        source,
                    })
                }
            },
        };
        drop(permit);
        result
    }

    /// Names whose listing positions fall in a generation's id range.
    /// `"all"` and unknown tags return the whole listing.
    pub async fn names_for_generation(&self, range_tag: &str) -> PokedexResult<Vec<String>> {
        let names = self.resolve_listing().await?;
        let range = match GenerationRange::lookup(range_tag) {
            Some(r) if r != GenerationRange::ALL => r,
            _ => return Ok(names.as_ref().clone()),
        };

        let start = (range.start as usize).saturating_sub(1).min(names.len());
        let end = (range.end as usize).min(names.len());
        Ok(names[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record_json(id: u32, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "sprites": { "front_default": format!("https://img.example/{}.png", id) },
            "types": [{ "slot": 1, "type": { "name": "grass" } }],
            "abilities": [{ "ability": { "name": "overgrow" }, "is_hidden": false }],
            "stats": [{ "stat": { "name": "hp" }, "base_stat": 45 }],
            "moves": [{ "move": { "name": "tackle" } }]
        })
    }

    async fn mount_record(server: &MockServer, key: &str, id: u32, name: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/pokemon/{}", key)))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json(id, name)))
            .expect(times)
            .mount(server)
            .await;
    }

    fn pokedex_for(server: &MockServer, policy: InflightPolicy) -> Pokedex {
        let client = ApiClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap();
        Pokedex::with_policy(client, policy)
    }

    // -------------------------------------------------------------------------
    // Records
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_second_lookup_is_cache_hit() {
        let server = MockServer::start().await;
        mount_record(&server, "25", 25, "pikachu", 1).await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let first = dex.resolve_record("25").await.unwrap();
        assert_eq!(dex.request_count(), 1);
        let second = dex.resolve_record("25").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(dex.request_count(), 1);
    }

    #[tokio::test]
    async fn test_id_lookup_fills_name_key() {
        let server = MockServer::start().await;
        mount_record(&server, "25", 25, "pikachu", 1).await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json(25, "pikachu")))
            .expect(0)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let by_id = dex.resolve_record("25").await.unwrap();
        assert_eq!(by_id.name, "pikachu");
        let by_name = dex.resolve_record("pikachu").await.unwrap();
        assert!(Arc::ptr_eq(&by_id, &by_name));
        assert_eq!(dex.request_count(), 1);
    }

    #[tokio::test]
    async fn test_name_lookup_is_case_insensitive() {
        let server = MockServer::start().await;
        mount_record(&server, "1", 1, "bulbasaur", 1).await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let first = dex.resolve_record("1").await.unwrap();
        assert_eq!(first.name, "bulbasaur");
        let count = dex.request_count();

        let again = dex.resolve_record("Bulbasaur").await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(dex.request_count(), count);
    }

    #[tokio::test]
    async fn test_mixed_case_miss_requests_lowercase() {
        let server = MockServer::start().await;
        mount_record(&server, "eevee", 133, "eevee", 1).await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let record = dex.resolve_record("  EeVee ").await.unwrap();
        assert_eq!(record.id, 133);
        assert!(dex.resolve_record("133").await.is_ok());
        assert_eq!(dex.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/doesnotexist"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(2)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        match dex.resolve_record("doesnotexist").await {
            Err(PokedexError::Fetch { identifier, source }) => {
                assert_eq!(identifier, "doesnotexist");
                assert!(source.is_not_found());
            }
            other => panic!("Expected Fetch error, got {:?}", other.map(|p| p.id)),
        }
        assert_eq!(dex.cache_stats().await.record_keys, 0);

        // No negative caching: the next call goes to the network again
        assert!(dex.resolve_record("doesnotexist").await.is_err());
        assert_eq!(dex.request_count(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/7"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let err = dex.resolve_record("7").await.unwrap_err();
        assert_eq!(err.identifier(), Some("7"));
        assert!(matches!(
            err,
            PokedexError::Fetch { source: ApiError::ServerError(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_identifier_skips_network() {
        let server = MockServer::start().await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);
        assert!(matches!(
            dex.resolve_record("   ").await,
            Err(PokedexError::EmptyIdentifier)
        ));
        assert_eq!(dex.request_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_uncoalesced_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(record_json(4, "charmander"))
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(3)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let results = futures::future::join_all((0..3).map(|_| dex.resolve_record("4"))).await;
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(dex.request_count(), 3);

        // All three inserts converge on one cached value
        let cached = dex.resolve_record("charmander").await.unwrap();
        assert!(Arc::ptr_eq(results[0].as_ref().unwrap(), &cached));
        assert_eq!(dex.cache_stats().await.records, 1);
    }

    #[tokio::test]
    async fn test_single_flight_coalesces_concurrent_lookups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(record_json(4, "charmander"))
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let dex = Arc::new(pokedex_for(&server, InflightPolicy::SingleFlight));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let dex = Arc::clone(&dex);
                tokio::spawn(async move { dex.resolve_record("4").await })
            })
            .collect();

        let mut records = Vec::new();
        for handle in handles {
            records.push(handle.await.unwrap().unwrap());
        }
        assert_eq!(dex.request_count(), 1);
        assert!(records.iter().all(|r| Arc::ptr_eq(r, &records[0])));
    }

    #[tokio::test]
    async fn test_single_flight_failure_lets_waiters_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(
                ResponseTemplate::new(404).set_delay(Duration::from_millis(50)),
            )
            .expect(2)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::SingleFlight);

        let (a, b) = tokio::join!(dex.resolve_record("missingno"), dex.resolve_record("missingno"));
        assert!(a.is_err() && b.is_err());
        assert_eq!(dex.request_count(), 2);
    }

    // -------------------------------------------------------------------------
    // Species
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_describe_caches_species() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon-species/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "flavor_text_entries": [
                    { "flavor_text": "A strange seed was\nplanted on its\nback at birth.", "language": { "name": "en" } }
                ],
                "genera": [{ "genus": "Seed Pokémon", "language": { "name": "en" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let summary = dex.describe(1).await;
        assert_eq!(
            summary,
            SpeciesSummary::Described {
                genus: "Seed Pokémon".to_string(),
                flavor_text: "A strange seed was planted on its back at birth.".to_string(),
            }
        );
        assert_eq!(dex.describe(1).await, summary);
        assert_eq!(dex.request_count(), 1);
    }

    #[tokio::test]
    async fn test_species_failure_is_soft() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon-species/10001"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let err = dex.resolve_species(10001).await.unwrap_err();
        assert!(err.is_soft());
        assert!(matches!(err, PokedexError::MissingDescription { id: 10001, .. }));
        assert_eq!(dex.describe(10001).await, SpeciesSummary::unavailable());
        assert_eq!(dex.cache_stats().await.species, 0);
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    fn type_json(names: &[&str]) -> serde_json::Value {
        let members: Vec<_> = names
            .iter()
            .map(|n| serde_json::json!({ "pokemon": { "name": n, "url": "u" }, "slot": 1 }))
            .collect();
        serde_json::json!({ "name": "ghost", "pokemon": members })
    }

    #[tokio::test]
    async fn test_category_fetched_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/type/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(type_json(&["gastly", "haunter"])))
            .expect(1)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let first = dex.resolve_category("ghost").await.unwrap();
        assert_eq!(first.members, vec!["gastly", "haunter"]);
        let second = dex.resolve_category("ghost").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(dex.request_count(), 1);
    }

    #[tokio::test]
    async fn test_random_from_single_member_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/type/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(type_json(&["gastly"])))
            .expect(1)
            .mount(&server)
            .await;
        mount_record(&server, "gastly", 92, "gastly", 1).await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let record = dex.random_from_category("ghost").await.unwrap();
        assert_eq!(record.id, 92);
        assert_eq!(dex.request_count(), 2);
    }

    #[tokio::test]
    async fn test_pick_from_category_skips_record_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/type/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(type_json(&["gastly"])))
            .expect(1)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        assert_eq!(dex.pick_from_category("ghost").await.unwrap(), "gastly");
        assert_eq!(dex.request_count(), 1);
        assert_eq!(dex.cache_stats().await.records, 0);
    }

    #[tokio::test]
    async fn test_random_from_empty_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/type/shadow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(type_json(&[])))
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        match dex.random_from_category("shadow").await {
            Err(PokedexError::EmptyListing { category }) => assert_eq!(category, "shadow"),
            other => panic!("Expected EmptyListing, got {:?}", other.map(|p| p.id)),
        }
    }

    #[tokio::test]
    async fn test_category_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/type/plasma"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let err = dex.resolve_category("plasma").await.unwrap_err();
        assert_eq!(err.identifier(), Some("plasma"));
        assert_eq!(dex.cache_stats().await.categories, 0);
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_names_for_generation_slices_listing() {
        let server = MockServer::start().await;
        let results: Vec<_> = (1..=200)
            .map(|i| serde_json::json!({ "name": format!("mon-{}", i), "url": "u" }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .and(query_param("limit", "3000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "count": 200, "results": results })),
            )
            .expect(1)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let gen1 = dex.names_for_generation("1").await.unwrap();
        assert_eq!(gen1.len(), 151);
        assert_eq!(gen1[0], "mon-1");
        assert_eq!(gen1[150], "mon-151");

        // Listing shorter than the range end is clamped
        let gen2 = dex.names_for_generation("2").await.unwrap();
        assert_eq!(gen2.len(), 49);
        assert_eq!(gen2[0], "mon-152");

        assert!(dex.names_for_generation("3").await.unwrap().is_empty());
        assert_eq!(dex.names_for_generation("all").await.unwrap().len(), 200);
        assert_eq!(dex.names_for_generation("bogus").await.unwrap().len(), 200);
        assert_eq!(dex.request_count(), 1);
    }

    #[tokio::test]
    async fn test_listing_failure_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(2)
            .mount(&server)
            .await;
        let dex = pokedex_for(&server, InflightPolicy::Independent);

        let err = dex.resolve_listing().await.unwrap_err();
        assert_eq!(err.identifier(), Some("listing (limit 3000)"));
        assert!(matches!(
            err,
            PokedexError::Fetch { source: ApiError::ServerError(_), .. }
        ));
        assert!(!dex.cache_stats().await.listing_loaded);

        // Generation slices surface the same failure and retry the fetch
        assert!(dex.names_for_generation("1").await.is_err());
        assert_eq!(dex.request_count(), 2);
    }

    #[tokio::test]
    async fn test_from_config_applies_listing_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .and(query_param("limit", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            api_base_url: Some(server.uri()),
            listing_limit: Some(10),
            inflight_policy: InflightPolicy::SingleFlight,
            ..Config::default()
        };
        let dex = Pokedex::from_config(&config).unwrap();
        assert_eq!(dex.inflight_policy(), InflightPolicy::SingleFlight);
        assert!(dex.resolve_listing().await.unwrap().is_empty());
    }
}
