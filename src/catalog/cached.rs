//! Session-lived memory cache for catalog data
//!
//! This module provides a caching wrapper for catalog providers that
//! memoises the show list and each show's episode list for as long as the
//! cache value lives.

use super::{CatalogProvider, Episode, FetchError, Show};
use std::collections::HashMap;

/// A memoising wrapper around a catalog provider
///
/// The show list is fetched at most once and every show's episodes are
/// fetched at most once per show id. Entries are never evicted or expired.
/// Failed fetches are not stored, so a later call tries again.
#[derive(Debug)]
pub struct MemoryCache<P>
where
    P: CatalogProvider,
{
    /// The underlying catalog
    provider: P,
    /// All shows, in presentation order
    shows: Option<Vec<Show>>,
    /// Episode lists keyed by show id
    episodes: HashMap<u64, Vec<Episode>>,
}

impl<P> MemoryCache<P>
where
    P: CatalogProvider,
{
    /// Creates an empty cache wrapping the given provider
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let tvmaze = TvMazeCatalog::new()?;
    /// let mut cache = MemoryCache::new(tvmaze);
    /// let shows = cache.get_shows()?;
    /// ```
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            shows: None,
            episodes: HashMap::new(),
        }
    }

    /// Returns all shows, fetching them on first use
    pub fn get_shows(&mut self) -> Result<&[Show], FetchError> {
        if self.shows.is_none() {
            tracing::debug!("show list cache miss");
            let shows = self.provider.list_shows()?;
            self.shows = Some(shows);
        }

        Ok(self.shows.as_deref().unwrap_or_default())
    }

    /// Returns the episodes of a show, fetching them on first use
    pub fn get_episodes(&mut self, show_id: u64) -> Result<&[Episode], FetchError> {
        if !self.episodes.contains_key(&show_id) {
            tracing::debug!(show_id, "episode cache miss");
            let episodes = self.provider.list_episodes(show_id)?;
            self.episodes.insert(show_id, episodes);
        }

        Ok(self
            .episodes
            .get(&show_id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Returns the cached show list without fetching
    pub fn cached_shows(&self) -> Option<&[Show]> {
        self.shows.as_deref()
    }

    /// Returns the cached episodes of a show without fetching
    pub fn cached_episodes(&self, show_id: u64) -> Option<&[Episode]> {
        self.episodes.get(&show_id).map(Vec::as_slice)
    }

    /// Looks up a show in the cached show list
    pub fn cached_show(&self, show_id: u64) -> Option<&Show> {
        self.shows.as_ref()?.iter().find(|s| s.id == show_id)
    }

    /// Whether the episodes of a show are already memoised
    pub fn is_cached(&self, show_id: u64) -> bool {
        self.episodes.contains_key(&show_id)
    }

    /// Returns the wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// In-process catalog that counts requests and can fail on demand.
    #[derive(Debug, Default)]
    pub(crate) struct FakeCatalog {
        pub shows: Vec<Show>,
        pub episodes: HashMap<u64, Vec<Episode>>,
        /// Show ids whose episode requests answer with the given HTTP status
        pub failing: RefCell<HashMap<u64, u16>>,
        pub fail_shows: Cell<bool>,
        pub show_calls: Cell<usize>,
        pub episode_calls: RefCell<HashMap<u64, usize>>,
    }

    impl FakeCatalog {
        pub(crate) fn episode_calls(&self, show_id: u64) -> usize {
            self.episode_calls
                .borrow()
                .get(&show_id)
                .copied()
                .unwrap_or(0)
        }

        pub(crate) fn total_episode_calls(&self) -> usize {
            self.episode_calls.borrow().values().sum()
        }
    }

    impl CatalogProvider for FakeCatalog {
        fn list_shows(&self) -> Result<Vec<Show>, FetchError> {
            self.show_calls.set(self.show_calls.get() + 1);
            if self.fail_shows.get() {
                return Err(FetchError::Request("connection refused".to_string()));
            }
            let mut shows = self.shows.clone();
            crate::catalog::sort_shows(&mut shows);
            Ok(shows)
        }

        fn list_episodes(&self, show_id: u64) -> Result<Vec<Episode>, FetchError> {
            *self.episode_calls.borrow_mut().entry(show_id).or_insert(0) += 1;
            if let Some(status) = self.failing.borrow().get(&show_id) {
                return Err(FetchError::Status {
                    status: *status,
                    reason: "Internal Server Error".to_string(),
                });
            }
            Ok(self.episodes.get(&show_id).cloned().unwrap_or_default())
        }
    }
}
