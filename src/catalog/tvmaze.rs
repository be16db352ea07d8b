/// TVMaze catalog implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeShow};
use super::{CatalogProvider, Episode, FetchError, Show, sort_shows};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default base URL of the public TVMaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Catalog backed by the TVMaze REST API.
///
/// This catalog fetches the show index from `{base}/shows` and the episode
/// list of a single show from `{base}/shows/{id}/episodes`.
#[derive(Debug)]
pub struct TvMazeCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeCatalog {
    /// Creates a catalog talking to the public TVMaze API.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_BASE_URL, None)
    }

    /// Creates a catalog for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the API, without the `/shows` path
    /// * `timeout` - Optional per-request timeout; `None` waits indefinitely
    pub fn with_options(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn shows_url(&self) -> String {
        format!("{}/shows", self.base_url)
    }

    fn episodes_url(&self, show_id: u64) -> String {
        format!("{}/shows/{}/episodes", self.base_url, show_id)
    }

    /// Issues a single GET and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url, "catalog request");

        let response = self.client.get(url).send().map_err(|e| {
            tracing::warn!(url, error = %e, "catalog request failed");
            FetchError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "catalog returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json()
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

impl CatalogProvider for TvMazeCatalog {
    fn list_shows(&self) -> Result<Vec<Show>, FetchError> {
        let raw: Vec<TvMazeShow> = self.get_json(&self.shows_url())?;

        // A malformed record must not hide the rest of the catalog
        let mut shows: Vec<Show> = raw
            .into_iter()
            .filter_map(|show| match show.into_show() {
                Ok(show) => Some(show),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping show");
                    None
                }
            })
            .collect();
        sort_shows(&mut shows);

        tracing::debug!(count = shows.len(), "fetched shows");
        Ok(shows)
    }

    fn list_episodes(&self, show_id: u64) -> Result<Vec<Episode>, FetchError> {
        let raw: Vec<TvMazeEpisode> = self.get_json(&self.episodes_url(show_id))?;
        let episodes: Vec<Episode> = raw.into_iter().map(TvMazeEpisode::into_episode).collect();

        tracing::debug!(show_id, count = episodes.len(), "fetched episodes");
        Ok(episodes)
    }
}
