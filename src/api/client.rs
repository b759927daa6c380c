//! PokeAPI Client
//!
//! Every successful response body is cached under its full request URL, so
//! paging back and forth or re-exploring an area does not hit the network
//! again until the entry has been swept.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::Cache;
use crate::error::ApiError;
use crate::models::{LocationArea, LocationPage, Pokemon};

/// Number of location areas per page
pub const PAGE_SIZE: u32 = 20;

/// Cached PokeAPI client.
#[derive(Debug, Clone)]
pub struct PokeApi {
    http: Client,
    base_url: String,
    cache: Cache,
}

impl PokeApi {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, cache: Cache) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!("Initializing API client for {}", base_url);
        Self {
            http: Client::new(),
            base_url,
            cache,
        }
    }

    /// Returns the response cache backing this client.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// URL of the first location-area page.
    pub fn first_location_page_url(&self) -> String {
        format!(
            "{}/location-area/?offset=0&limit={}",
            self.base_url, PAGE_SIZE
        )
    }

    // == Location Areas ==
    /// Fetches a page of location areas, or the first page when `page_url`
    /// is `None`.
    pub async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationPage, ApiError> {
        match page_url {
            Some(url) => self.fetch_json(url).await,
            None => self.fetch_json(&self.first_location_page_url()).await,
        }
    }

    /// Fetches one location area with its pokemon encounters.
    pub async fn location_area(&self, name: &str) -> Result<LocationArea, ApiError> {
        let url = format!("{}/location-area/{}", self.base_url, path_segment(name)?);
        self.fetch_json(&url).await
    }

    // == Pokemon ==
    /// Fetches one pokemon by name or id.
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = format!("{}/pokemon/{}", self.base_url, path_segment(name)?);
        self.fetch_json(&url).await
    }

    // == Fetch ==
    /// Returns the body for `url`, from the cache when present.
    ///
    /// Only 2xx bodies are cached. The cache lock is never held while the
    /// request is in flight.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        if let Some(body) = self.cache.get(url) {
            debug!(url, "Using cached response");
            return Ok(body);
        }

        debug!(url, "Fetching from API");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?.to_vec();
        debug!(url, bytes = body.len(), "Caching response");
        self.cache.put(url, body.clone());
        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.fetch(url).await?;
        debug!(url, "Decoding JSON response");
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Accepts `name` only if it stays a single path segment once joined into a URL.
fn path_segment(name: &str) -> Result<&str, ApiError> {
    let escapes = name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| {
            matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
        });
    if escapes {
        return Err(ApiError::InvalidName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn test_api(base_url: &str) -> PokeApi {
        let cache = Cache::new(Duration::from_secs(60)).unwrap();
        PokeApi::new(base_url, cache)
    }

    #[tokio::test]
    async fn test_first_page_url() {
        let api = test_api("https://pokeapi.co/api/v2/").await;
        assert_eq!(
            api.first_location_page_url(),
            "https://pokeapi.co/api/v2/location-area/?offset=0&limit=20"
        );
        api.cache().shutdown().await;
    }

    #[tokio::test]
    async fn test_cached_body_skips_network() {
        // Nothing listens on this address; a network call would fail.
        let api = test_api("http://127.0.0.1:9").await;
        let url = "http://127.0.0.1:9/pokemon/ditto";
        api.cache().put(
            url,
            br#"{"name": "ditto", "base_experience": 101}"#.to_vec(),
        );

        let pokemon = api.pokemon("ditto").await.unwrap();
        assert_eq!(pokemon.name, "ditto");
        assert_eq!(pokemon.base_experience, Some(101));
        api.cache().shutdown().await;
    }

    #[tokio::test]
    async fn test_cached_bad_json_is_decode_error() {
        let api = test_api("http://127.0.0.1:9").await;
        api.cache()
            .put("http://127.0.0.1:9/location-area/broken", b"<html>".to_vec());

        let result = api.location_area("broken").await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
        api.cache().shutdown().await;
    }

    #[test]
    fn test_path_segment_accepts_api_names() {
        assert_eq!(path_segment("canalave-city-area").unwrap(), "canalave-city-area");
        assert_eq!(path_segment("mr-mime").unwrap(), "mr-mime");
        assert_eq!(path_segment("25").unwrap(), "25");
    }

    #[tokio::test]
    async fn test_names_leaving_their_segment_are_rejected() {
        let api = test_api("http://127.0.0.1:9").await;
        api.cache().put(
            "http://127.0.0.1:9/pokemon/pikachu",
            br#"{"name": "pikachu", "base_experience": 112}"#.to_vec(),
        );

        for name in ["../pokemon/pikachu", "..", ".", "", "a?b=1", "a#b", "a%2Fb", "a\\b"] {
            let result = api.location_area(name).await;
            assert!(
                matches!(result, Err(ApiError::InvalidName(ref n)) if n == name),
                "{:?} was not rejected: {:?}",
                name,
                result
            );
        }
        assert!(matches!(
            api.pokemon("pikachu/../ditto").await,
            Err(ApiError::InvalidName(_))
        ));

        assert_eq!(api.cache().len(), 1);
        api.cache().shutdown().await;
    }
}
