//! Selection controller
//!
//! A small state machine that turns user actions into cache lookups,
//! filtering and rendering. The controller owns the session cache, so
//! memoised shows and episodes live exactly as long as the controller.
//!
//! Actions are handled synchronously: a fetch finishes before the next
//! action is accepted, so a response can never land on a selection newer
//! than the one it was requested for.

use crate::catalog::{CatalogProvider, Episode, MemoryCache};
use crate::filter::{filter_by_text, page_count};
use crate::render::{
    Renderer, SelectOption, View, default_episode_options, episode_options, show_options,
};

/// Which list the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The paginated show list
    BrowsingShows,
    /// The episode list of one show
    BrowsingEpisodes { show_id: u64 },
}

/// User driven events the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Initial load of the show list
    Load,
    /// Pick a show from the list or the show selector
    SelectShow(u64),
    /// Reset the show selector to its default option
    ClearShow,
    /// Leave the episode list and return to the shows
    Back,
    /// Change the search term
    Search(String),
    /// Pick one episode from the episode selector, `None` shows all again
    SelectEpisode(Option<u64>),
    NextPage,
    PrevPage,
    /// Jump to a 1-indexed show list page, clamped to the available pages
    GoToPage(usize),
}

/// Transient selection state of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub show_id: Option<u64>,
    pub episode_id: Option<u64>,
    pub search_term: String,
    /// Current show list page, 1-indexed
    pub page: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            show_id: None,
            episode_id: None,
            search_term: String::new(),
            page: 1,
        }
    }
}

/// Drives the browse session
#[derive(Debug)]
pub struct Controller<P>
where
    P: CatalogProvider,
{
    cache: MemoryCache<P>,
    renderer: Renderer,
    page_size: usize,
    state: State,
    selection: Selection,
    view: View,
    show_options: Vec<SelectOption>,
    episode_options: Vec<SelectOption>,
}

impl<P> Controller<P>
where
    P: CatalogProvider,
{
    /// Creates a controller in the `BrowsingShows` state with an empty view
    ///
    /// Nothing is fetched until [`Action::Load`] is handled.
    pub fn new(provider: P, renderer: Renderer, page_size: usize) -> Self {
        Self {
            cache: MemoryCache::new(provider),
            renderer,
            page_size: page_size.max(1),
            state: State::BrowsingShows,
            selection: Selection::default(),
            view: View::empty(),
            show_options: show_options(&[]),
            episode_options: default_episode_options(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The view produced by the last handled action
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn show_options(&self) -> &[SelectOption] {
        &self.show_options
    }

    pub fn episode_options(&self) -> &[SelectOption] {
        &self.episode_options
    }

    pub fn cache(&self) -> &MemoryCache<P> {
        &self.cache
    }

    /// Handles an action and returns the resulting view
    pub fn handle(&mut self, action: Action) -> &View {
        self.handle_with_progress(action, |_| {})
    }

    /// Handles an action, reporting a loading view before any network fetch
    ///
    /// The callback is only invoked when the action misses the cache.
    pub fn handle_with_progress<F>(&mut self, action: Action, mut progress: F) -> &View
    where
        F: FnMut(&View),
    {
        tracing::debug!(?action, state = ?self.state, "handling action");

        match action {
            Action::Load => {
                self.enter_shows();
                if self.cache.cached_shows().is_none() {
                    progress(&self.renderer.render_loading("shows"));
                }
                self.render_show_list();
            }
            Action::SelectShow(show_id) => {
                if !self.cache.is_cached(show_id) {
                    progress(&self.renderer.render_loading("episodes"));
                }
                self.select_show(show_id);
            }
            Action::ClearShow => {
                self.enter_shows();
                self.view = View::empty();
            }
            Action::Back => {
                self.enter_shows();
                if self.cache.cached_shows().is_none() {
                    progress(&self.renderer.render_loading("shows"));
                }
                self.render_show_list();
            }
            Action::Search(term) => {
                self.selection.search_term = term;
                match self.state {
                    State::BrowsingShows => {
                        self.selection.page = 1;
                        self.render_show_list();
                    }
                    State::BrowsingEpisodes { show_id } => {
                        self.selection.episode_id = None;
                        self.render_episode_list(show_id);
                    }
                }
            }
            Action::SelectEpisode(episode_id) => {
                if let State::BrowsingEpisodes { show_id } = self.state {
                    self.selection.episode_id = episode_id;
                    self.render_episode_list(show_id);
                }
            }
            Action::NextPage => self.go_to_page(self.selection.page.saturating_add(1)),
            Action::PrevPage => self.go_to_page(self.selection.page.saturating_sub(1)),
            Action::GoToPage(page) => self.go_to_page(page),
        }

        &self.view
    }

    /// Resets the episode related selection and returns to the show list
    fn enter_shows(&mut self) {
        self.state = State::BrowsingShows;
        self.selection.show_id = None;
        self.selection.episode_id = None;
        self.selection.search_term.clear();
        self.episode_options = default_episode_options();
    }

    fn select_show(&mut self, show_id: u64) {
        match self.cache.get_episodes(show_id) {
            Ok(episodes) => {
                tracing::info!(show_id, count = episodes.len(), "showing episodes");
                self.episode_options = episode_options(episodes);
                self.view = self.renderer.render_episodes(episodes);
                self.state = State::BrowsingEpisodes { show_id };
                self.selection.show_id = Some(show_id);
                self.selection.episode_id = None;
                self.selection.search_term.clear();
            }
            Err(e) => {
                tracing::warn!(show_id, error = %e, "failed to load episodes");
                self.view = self
                    .renderer
                    .render_error(&format!("Error loading episodes: {}", e));
            }
        }
    }

    fn render_show_list(&mut self) {
        let shows = match self.cache.get_shows() {
            Ok(shows) => shows,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load shows");
                self.view = self
                    .renderer
                    .render_error(&format!("Error loading shows: {}", e));
                return;
            }
        };

        let filtered = filter_by_text(shows, &self.selection.search_term);
        let pages = page_count(filtered.len(), self.page_size).max(1);
        self.selection.page = self.selection.page.clamp(1, pages);
        self.show_options = show_options(shows);
        self.view = self
            .renderer
            .render_shows(&filtered, self.selection.page, self.page_size);
    }

    fn render_episode_list(&mut self, show_id: u64) {
        let episodes = self.cache.cached_episodes(show_id).unwrap_or_default();

        let visible: Vec<Episode> = match self.selection.episode_id {
            Some(episode_id) => episodes
                .iter()
                .filter(|e| e.id == episode_id)
                .cloned()
                .collect(),
            None => filter_by_text(episodes, &self.selection.search_term),
        };

        self.view = self.renderer.render_episodes(&visible);
    }

    fn go_to_page(&mut self, page: usize) {
        if self.state != State::BrowsingShows {
            return;
        }
        let Some(shows) = self.cache.cached_shows() else {
            return;
        };

        let matching = filter_by_text(shows, &self.selection.search_term).len();
        let pages = page_count(matching, self.page_size).max(1);
        let target = page.clamp(1, pages);
        if target != self.selection.page {
            self.selection.page = target;
            self.render_show_list();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;
    use crate::catalog::fixtures::{episode, show};
    use crate::catalog::{Episode, Show};

    fn controller_with(shows: Vec<Show>, episodes: Vec<(u64, Vec<Episode>)>) -> Controller<FakeCatalog> {
        let mut fake = FakeCatalog {
            shows,
            ..Default::default()
        };
        fake.episodes.extend(episodes);
        Controller::new(fake, Renderer::default(), 20)
    }

    fn doctor_who() -> Controller<FakeCatalog> {
        let mut rose = episode(11, 1, 1, "Rose");
        rose.summary = Some("<p>Rose meets the Doctor.</p>".to_string());
        let mut dalek = episode(12, 1, 6, "Dalek");
        dalek.summary = Some("<p>The last dalek.</p>".to_string());
        let mut boom = episode(13, 1, 11, "Boom Town");
        boom.summary = Some("<p>Cardiff again.</p>".to_string());

        controller_with(
            vec![show(1, "Doctor Who"), show(2, "Torchwood")],
            vec![(1, vec![rose, dalek, boom]), (2, vec![episode(21, 1, 1, "Everything Changes")])],
        )
    }

    fn titles(view: &View) -> Vec<String> {
        view.cards.iter().map(|c| c.title.clone()).collect()
    }

    #[test]
    fn test_load_renders_sorted_show_list() {
        let mut controller = controller_with(
            vec![show(2, "B Show"), show(1, "a show")],
            vec![],
        );

        let view = controller.handle(Action::Load).clone();
        assert_eq!(titles(&view), vec!["a show", "B Show"]);
        assert_eq!(controller.state(), State::BrowsingShows);
        assert_eq!(controller.show_options().len(), 3);
    }

    #[test]
    fn test_select_show_renders_episodes_once() {
        let mut controller = controller_with(
            vec![show(1, "A"), show(2, "B")],
            vec![(1, vec![episode(100, 1, 1, "Pilot")])],
        );
        controller.handle(Action::Load);

        let view = controller.handle(Action::SelectShow(1)).clone();
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].title, "Pilot (S01E01)");
        assert_eq!(view.count_label.as_deref(), Some("Matching Episodes: 1"));
        assert_eq!(controller.state(), State::BrowsingEpisodes { show_id: 1 });

        controller.handle(Action::SelectShow(1));
        assert_eq!(controller.cache().provider().episode_calls(1), 1);
    }

    #[test]
    fn test_failed_fetch_renders_error_and_keeps_other_cache() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(2));
        controller.handle(Action::Back);

        controller
            .cache()
            .provider()
            .failing
            .borrow_mut()
            .insert(1, 500);
        let view = controller.handle(Action::SelectShow(1)).clone();

        assert!(view.cards.is_empty());
        assert_eq!(
            view.message.as_deref(),
            Some("Error loading episodes: HTTP 500 Internal Server Error")
        );
        assert_eq!(controller.state(), State::BrowsingShows);
        assert!(!controller.cache().is_cached(1));
        assert_eq!(controller.cache().cached_episodes(2).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_show_list_renders_error() {
        let mut controller = doctor_who();
        controller.cache().provider().fail_shows.set(true);

        let view = controller.handle(Action::Load).clone();
        assert_eq!(
            view.message.as_deref(),
            Some("Error loading shows: Request failed: connection refused")
        );

        controller.cache().provider().fail_shows.set(false);
        assert_eq!(controller.handle(Action::Load).cards.len(), 2);
    }

    #[test]
    fn test_search_filters_episodes() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(1));

        let view = controller.handle(Action::Search("DALEK".to_string())).clone();
        assert_eq!(titles(&view), vec!["Dalek (S01E06)"]);
        assert_eq!(view.count_label.as_deref(), Some("Matching Episodes: 1"));
        assert_eq!(controller.state(), State::BrowsingEpisodes { show_id: 1 });

        let view = controller.handle(Action::Search(String::new())).clone();
        assert_eq!(view.cards.len(), 3);
    }

    #[test]
    fn test_search_filters_shows() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);

        let view = controller.handle(Action::Search("torch".to_string())).clone();
        assert_eq!(titles(&view), vec!["Torchwood"]);
        assert_eq!(controller.state(), State::BrowsingShows);
    }

    #[test]
    fn test_select_single_episode_and_restore() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(1));

        let view = controller.handle(Action::SelectEpisode(Some(13))).clone();
        assert_eq!(titles(&view), vec!["Boom Town (S01E11)"]);
        assert_eq!(controller.selection().episode_id, Some(13));

        let view = controller.handle(Action::SelectEpisode(None)).clone();
        assert_eq!(view.cards.len(), 3);

        let view = controller.handle(Action::SelectEpisode(Some(999))).clone();
        assert!(view.cards.is_empty());
        assert_eq!(view.count_label.as_deref(), Some("Matching Episodes: 0"));
    }

    #[test]
    fn test_episode_selector_options() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(1));

        let labels: Vec<&str> = controller
            .episode_options()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Show All Episodes",
                "S01E01 - Rose",
                "S01E06 - Dalek",
                "S01E11 - Boom Town"
            ]
        );
    }

    #[test]
    fn test_back_discards_episode_state() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(1));
        controller.handle(Action::Search("dalek".to_string()));

        let view = controller.handle(Action::Back).clone();
        assert_eq!(controller.state(), State::BrowsingShows);
        assert_eq!(controller.selection(), &Selection::default());
        assert_eq!(view.cards.len(), 2);
        assert_eq!(controller.cache().provider().show_calls.get(), 1);
        assert_eq!(controller.episode_options().len(), 1);
    }

    #[test]
    fn test_clear_show_empties_view() {
        let mut controller = doctor_who();
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(1));
        controller.handle(Action::SelectEpisode(Some(12)));

        let view = controller.handle(Action::ClearShow).clone();
        assert!(view.is_empty());
        assert_eq!(controller.state(), State::BrowsingShows);
        assert_eq!(controller.selection().show_id, None);
        assert_eq!(controller.selection().episode_id, None);
        assert_eq!(controller.episode_options()[0].label, "Show All Episodes");
        assert_eq!(controller.episode_options().len(), 1);
    }

    #[test]
    fn test_paging_stays_within_bounds() {
        let shows: Vec<Show> = (1..=45).map(|i| show(i, &format!("Show {:02}", i))).collect();
        let mut controller = controller_with(shows, vec![]);
        controller.handle(Action::Load);

        controller.handle(Action::PrevPage);
        assert_eq!(controller.selection().page, 1);

        controller.handle(Action::NextPage);
        let view = controller.handle(Action::NextPage).clone();
        assert_eq!(controller.selection().page, 3);
        assert_eq!(view.cards.len(), 5);
        assert_eq!(view.cards[0].title, "Show 41");

        controller.handle(Action::NextPage);
        assert_eq!(controller.selection().page, 3);

        // Searching resets to the first page
        controller.handle(Action::Search("show".to_string()));
        assert_eq!(controller.selection().page, 1);
    }

    #[test]
    fn test_go_to_page_is_clamped() {
        let shows: Vec<Show> = (1..=45).map(|i| show(i, &format!("Show {:02}", i))).collect();
        let mut controller = controller_with(shows, vec![]);
        controller.handle(Action::Load);

        let view = controller.handle(Action::GoToPage(99)).clone();
        assert_eq!(controller.selection().page, 3);
        assert_eq!(view.cards[0].title, "Show 41");

        controller.handle(Action::GoToPage(0));
        assert_eq!(controller.selection().page, 1);

        controller.handle(Action::GoToPage(2));
        assert_eq!(controller.selection().page, 2);
        assert_eq!(controller.cache().provider().show_calls.get(), 1);
    }

    #[test]
    fn test_show_selector_keeps_default_after_failed_load() {
        let mut controller = controller_with(vec![show(1, "A")], vec![]);
        assert_eq!(controller.show_options().len(), 1);

        controller.cache().provider().fail_shows.set(true);
        controller.handle(Action::Load);

        assert!(controller.view().message.is_some());
        assert_eq!(controller.show_options().len(), 1);
        assert_eq!(controller.show_options()[0].label, "Select a Show");
        assert_eq!(controller.show_options()[0].value, None);
    }

    #[test]
    fn test_paging_ignored_while_browsing_episodes() {
        let shows: Vec<Show> = (1..=45).map(|i| show(i, &format!("Show {:02}", i))).collect();
        let mut controller = controller_with(shows, vec![(1, vec![episode(1, 1, 1, "Pilot")])]);
        controller.handle(Action::Load);
        controller.handle(Action::SelectShow(1));

        let view = controller.handle(Action::NextPage).clone();
        assert_eq!(titles(&view), vec!["Pilot (S01E01)"]);
        assert_eq!(controller.selection().page, 1);
    }

    #[test]
    fn test_progress_only_reported_on_cache_miss() {
        let mut controller = doctor_who();
        let mut notices = Vec::new();

        controller.handle_with_progress(Action::Load, |v| notices.push(v.clone()));
        controller.handle_with_progress(Action::SelectShow(1), |v| notices.push(v.clone()));
        controller.handle_with_progress(Action::SelectShow(1), |v| notices.push(v.clone()));
        controller.handle_with_progress(Action::Back, |v| notices.push(v.clone()));

        let messages: Vec<&str> = notices
            .iter()
            .filter_map(|v| v.message.as_deref())
            .collect();
        assert_eq!(messages, vec!["Loading shows...", "Loading episodes..."]);
        assert_eq!(controller.cache().provider().total_episode_calls(), 1);
    }
}
