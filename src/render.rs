//! View rendering
//!
//! This module projects show and episode records into a [`View`]: a
//! toolkit-independent description of what is on screen (cards, a count
//! label, pagination controls, or a plain message). Every render call builds
//! a complete view from scratch; nothing is patched incrementally.
//! [`View`] implements `Display` to produce the terminal rendering.

use crate::catalog::{Episode, Show};
use crate::filter::{page_count, paginate};
use std::fmt;

/// Image reference used when a record carries no image
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "placeholder.jpg";
/// Summary text used when a record carries no summary
pub const NO_SUMMARY: &str = "No summary available.";
/// Title used for episodes without a name
pub const UNTITLED_EPISODE: &str = "Untitled Episode";
/// Label of the show selector's default option
pub const SELECT_A_SHOW: &str = "Select a Show";
/// Label of the episode selector's default option
pub const SHOW_ALL_EPISODES: &str = "Show All Episodes";

/// Formats the `SxxEyy` code of an episode
///
/// Both numbers are zero-padded to at least two digits.
pub fn format_episode_code(season: u32, number: u32) -> String {
    format!("S{:02}E{:02}", season, number)
}

/// A labelled value on a card, such as the rating of a show
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub label: &'static str,
    pub value: String,
}

/// One rendered show or episode
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    /// Image URL or the placeholder reference
    pub image: String,
    /// Plain-text summary
    pub summary: String,
    pub details: Vec<Detail>,
    /// Detail page link
    pub link: Option<String>,
}

/// Page indicator and prev/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Current page, 1-indexed
    pub page: usize,
    /// Total number of pages (at least 1)
    pub pages: usize,
}

impl Pager {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// An entry of a show or episode selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Record id, `None` for the default option
    pub value: Option<u64>,
    pub label: String,
}

/// Everything shown in the results area after one render call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub cards: Vec<Card>,
    /// Results count label such as `Matching Episodes: 3`
    pub count_label: Option<String>,
    pub pager: Option<Pager>,
    /// Plain-text message shown in place of content (errors, loading)
    pub message: Option<String>,
}

impl View {
    /// A blank results area
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the view shows nothing at all
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
            && self.count_label.is_none()
            && self.pager.is_none()
            && self.message.is_none()
    }
}

/// Builds views for shows and episodes
#[derive(Debug, Clone)]
pub struct Renderer {
    placeholder_image: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_IMAGE)
    }
}

impl Renderer {
    /// Creates a renderer using the given placeholder image reference
    pub fn new(placeholder_image: &str) -> Self {
        Self {
            placeholder_image: placeholder_image.to_string(),
        }
    }

    fn image_or_placeholder(&self, image: Option<&str>) -> String {
        image.unwrap_or(&self.placeholder_image).to_string()
    }

    /// Renders one page of shows with pagination controls
    ///
    /// The page is clamped into the valid range, so an empty list still
    /// renders as page 1 of 1.
    pub fn render_shows(&self, shows: &[Show], page: usize, page_size: usize) -> View {
        let pages = page_count(shows.len(), page_size).max(1);
        let page = page.clamp(1, pages);

        View {
            cards: paginate(shows, page, page_size)
                .iter()
                .map(|show| self.show_card(show))
                .collect(),
            count_label: Some(format!("Matching Shows: {}", shows.len())),
            pager: Some(Pager { page, pages }),
            message: None,
        }
    }

    /// Renders all given episodes with a matching count label
    pub fn render_episodes(&self, episodes: &[Episode]) -> View {
        View {
            cards: episodes.iter().map(|e| self.episode_card(e)).collect(),
            count_label: Some(format!("Matching Episodes: {}", episodes.len())),
            pager: None,
            message: None,
        }
    }

    /// Renders a plain-text error in place of content
    pub fn render_error(&self, message: &str) -> View {
        View {
            message: Some(message.to_string()),
            ..View::default()
        }
    }

    /// Renders a plain-text progress notice in place of content
    pub fn render_loading(&self, what: &str) -> View {
        View {
            message: Some(format!("Loading {}...", what)),
            ..View::default()
        }
    }

    fn show_card(&self, show: &Show) -> Card {
        let mut details = Vec::new();
        if let Some(rating) = show.rating {
            details.push(Detail {
                label: "Rating",
                value: format!("{:.1}", rating),
            });
        }
        if !show.genres.is_empty() {
            details.push(Detail {
                label: "Genres",
                value: show.genres.join(" | "),
            });
        }
        if let Some(status) = &show.status {
            details.push(Detail {
                label: "Status",
                value: status.clone(),
            });
        }
        if let Some(runtime) = show.runtime {
            details.push(Detail {
                label: "Runtime",
                value: format!("{} min", runtime),
            });
        }

        Card {
            title: show.name.clone(),
            image: self.image_or_placeholder(show.image.as_deref()),
            summary: summary_text(show.summary.as_deref()),
            details,
            link: None,
        }
    }

    fn episode_card(&self, episode: &Episode) -> Card {
        Card {
            title: episode_title(episode),
            image: self.image_or_placeholder(episode.image.as_deref()),
            summary: summary_text(episode.summary.as_deref()),
            details: Vec::new(),
            link: episode.url.clone(),
        }
    }
}

/// Episode title with its code, e.g. `Pilot (S01E01)`
pub fn episode_title(episode: &Episode) -> String {
    format!(
        "{} ({})",
        episode.name.as_deref().unwrap_or(UNTITLED_EPISODE),
        format_episode_code(episode.season, episode.number)
    )
}

/// Converts an HTML summary to display text, falling back when blank
fn summary_text(summary: Option<&str>) -> String {
    summary
        .map(|s| nanohtml2text::html2text(s).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SUMMARY.to_string())
}

/// Options of the show selector
pub fn show_options(shows: &[Show]) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: None,
        label: SELECT_A_SHOW.to_string(),
    }];
    options.extend(shows.iter().map(|show| SelectOption {
        value: Some(show.id),
        label: show.name.clone(),
    }));
    options
}

/// Options of the episode selector, labelled `SxxEyy - name`
pub fn episode_options(episodes: &[Episode]) -> Vec<SelectOption> {
    let mut options = default_episode_options();
    options.extend(episodes.iter().map(|episode| SelectOption {
        value: Some(episode.id),
        label: format!(
            "{} - {}",
            format_episode_code(episode.season, episode.number),
            episode.name.as_deref().unwrap_or(UNTITLED_EPISODE)
        ),
    }));
    options
}

/// The episode selector holding only its default option
pub fn default_episode_options() -> Vec<SelectOption> {
    vec![SelectOption {
        value: None,
        label: SHOW_ALL_EPISODES.to_string(),
    }]
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "Image: {}", self.image)?;
        writeln!(f, "{}", self.summary)?;
        for detail in &self.details {
            writeln!(f, "{}: {}", detail.label, detail.value)?;
        }
        if let Some(link) = &self.link {
            writeln!(f, "More Info: {}", link)?;
        }
        Ok(())
    }
}

impl fmt::Display for Pager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prev = if self.has_prev() { "[< Prev]" } else { "[ ---- ]" };
        let next = if self.has_next() { "[Next >]" } else { "[ ---- ]" };
        write!(f, "{}  Page {} of {}  {}", prev, self.page, self.pages, next)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            writeln!(f, "{}", message)?;
        }
        for card in &self.cards {
            writeln!(f, "{}", card)?;
        }
        if let Some(pager) = &self.pager {
            writeln!(f, "{}", pager)?;
        }
        if let Some(label) = &self.count_label {
            writeln!(f, "{}", label)?;
        }
        Ok(())
    }
}
