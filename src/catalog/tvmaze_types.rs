/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
/// Anything the API may send as `null` is optional here; defaults and
/// validation happen when converting into [`Show`] and [`Episode`].
use super::{Episode, FetchError, Show};
use serde::Deserialize;

/// A show from the `/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub runtime: Option<u32>,
    pub rating: Option<TvMazeRating>,
    pub image: Option<TvMazeImage>,
    pub summary: Option<String>,
}

/// Rating object attached to a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeRating {
    pub average: Option<f64>,
}

/// Image links attached to shows and episodes.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub medium: Option<String>,
}

/// A single episode from the `/shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    pub url: Option<String>,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season number (may be null for unnumbered specials)
    pub season: Option<u32>,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    pub image: Option<TvMazeImage>,
    /// Episode summary in HTML format (may be null)
    pub summary: Option<String>,
}

/// Drops empty and whitespace-only strings.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl TvMazeShow {
    /// Validates the raw show and converts it into a [`Show`].
    pub fn into_show(self) -> Result<Show, FetchError> {
        let name = non_blank(self.name)
            .ok_or_else(|| FetchError::InvalidData(format!("show {} has no name", self.id)))?;

        Ok(Show {
            id: self.id,
            name,
            image: non_blank(self.image.and_then(|i| i.medium)),
            summary: non_blank(self.summary),
            genres: self.genres,
            rating: self.rating.and_then(|r| r.average),
            status: non_blank(self.status),
            runtime: self.runtime,
        })
    }
}

impl TvMazeEpisode {
    /// Converts the raw episode into an [`Episode`], defaulting missing numbers to 0.
    pub fn into_episode(self) -> Episode {
        Episode {
            id: self.id,
            name: non_blank(self.name),
            season: self.season.unwrap_or(0),
            number: self.number.unwrap_or(0),
            image: non_blank(self.image.and_then(|i| i.medium)),
            summary: non_blank(self.summary),
            url: non_blank(self.url),
        }
    }
}
