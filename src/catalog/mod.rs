//! Data structures and traits for TV catalog retrieval.
//!
//! This module provides the show and episode records the rest of the crate
//! works with, the error type for catalog requests, and the trait that
//! catalog backends implement.

mod cached;
mod tvmaze;
mod tvmaze_types;

pub use cached::MemoryCache;
#[cfg(test)]
pub(crate) use cached::testing;
pub use tvmaze::{DEFAULT_BASE_URL, TvMazeCatalog};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors that can occur while fetching data from the catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or no response was received
    #[error("Request failed: {0}")]
    Request(String),

    /// The catalog answered with a non-success HTTP status
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// The catalog returned data that violates the record shape
    #[error("API returned invalid data: {0}")]
    InvalidData(String),
}

/// A TV show as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Catalog identifier, unique across shows
    pub id: u64,
    /// Display name
    pub name: String,
    /// Medium sized poster image URL
    pub image: Option<String>,
    /// Free-text summary, may contain HTML markup
    pub summary: Option<String>,
    /// Genre tags
    pub genres: Vec<String>,
    /// Average rating
    pub rating: Option<f64>,
    /// Running status such as "Ended" or "Running"
    pub status: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Catalog identifier, unique within the show
    pub id: u64,
    /// Episode title
    pub name: Option<String>,
    /// The season number this episode belongs to
    pub season: u32,
    /// The episode number within the season
    pub number: u32,
    /// Medium sized still image URL
    pub image: Option<String>,
    /// Free-text summary, may contain HTML markup
    pub summary: Option<String>,
    /// Detail page URL
    pub url: Option<String>,
}

/// Trait for catalogs that can list shows and their episodes.
///
/// Every call is a single attempt: implementors do not retry and any
/// failure is returned to the caller as a [`FetchError`].
pub trait CatalogProvider {
    /// Fetches all shows, sorted by name (case-insensitive).
    fn list_shows(&self) -> Result<Vec<Show>, FetchError>;

    /// Fetches every episode of the given show in catalog order.
    fn list_episodes(&self, show_id: u64) -> Result<Vec<Episode>, FetchError>;
}

/// Orders show names case-insensitively.
///
/// Names equal under case folding fall back to their original spelling so
/// the resulting order is deterministic.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorts shows by name the way the show list is presented.
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
}
