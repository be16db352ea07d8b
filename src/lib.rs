//! show_browser - Browse TV shows and their episodes from the TVMaze catalog
//!
//! This library provides the catalog client, a session-lived memory cache,
//! text filtering and pagination, a toolkit-independent view renderer, and
//! the selection controller that ties them together.

mod catalog;
mod config;
mod controller;
mod filter;
mod render;

use std::io;
use thiserror::Error;

// Re-export error types
pub use catalog::FetchError;
pub use config::ConfigError;

pub use catalog::{
    CatalogProvider, DEFAULT_BASE_URL, Episode, MemoryCache, Show, TvMazeCatalog, compare_names,
    sort_shows,
};
pub use config::{Config, ConfigFile, DEFAULT_PAGE_SIZE, Overrides};
pub use controller::{Action, Controller, Selection, State};
pub use filter::{Searchable, filter_by_text, matches_text, page_count, paginate};
pub use render::{
    Card, Detail, Pager, Renderer, SelectOption, View, episode_options, episode_title,
    format_episode_code, show_options,
};

/// Top-level error type for show_browser operations
#[derive(Debug, Error)]
pub enum ShowBrowserError {
    /// Error while talking to the catalog
    #[error("Catalog error: {0}")]
    Fetch(#[from] FetchError),

    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from an interactive prompt
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Opens a browse session against the configured TVMaze endpoint
///
/// The returned controller starts in [`State::BrowsingShows`] with an empty
/// view; handle [`Action::Load`] to fetch and render the show list.
///
/// # Examples
///
/// ```no_run
/// use show_browser::{Action, Config, open_session};
///
/// let mut session = open_session(&Config::default()).unwrap();
/// print!("{}", session.handle(Action::Load));
/// print!("{}", session.handle(Action::SelectShow(82)));
/// ```
pub fn open_session(config: &Config) -> Result<Controller<TvMazeCatalog>, ShowBrowserError> {
    tracing::debug!(base_url = %config.base_url, page_size = config.page_size, "opening session");

    let catalog = TvMazeCatalog::with_options(&config.base_url, config.timeout)?;
    let renderer = Renderer::new(&config.placeholder_image);

    Ok(Controller::new(catalog, renderer, config.page_size))
}
