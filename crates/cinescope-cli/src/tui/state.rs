//! Browser state: screens, navigation, key handling, and outcome merging.
//!
//! State never performs I/O. Key presses and outcomes mutate it and queue
//! [`Effect`]s, which the event loop drains after every step.

use chrono::NaiveDate;
use cinescope_api::feed::FeedStatus;
use cinescope_api::tmdb::{
    CastMember, Genre, Movie, MovieDetails, MovieSource, SearchMovieParams, TimeWindow,
    movie_page_url, select_trailer, trailer_url,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::fetch::{FeedSlot, Outcome, PagedFeed, Request};
use super::scroll::{Carousel, ListCursor};

/// Screens reachable from the tab bar, in tab order.
pub const TABS: [Screen; 3] = [Screen::Home, Screen::Movies, Screen::Genres];

/// A browser screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Hero banner and home sections.
    Home,
    /// All movies, newest release first.
    Movies,
    /// Genre chips and results.
    Genres,
    /// Search results.
    Search,
    /// Movie details.
    Details(u64),
}

/// Input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation keys.
    Normal,
    /// Typing into the search box.
    Search,
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Leave the browser.
    Quit,
}

/// Side effect requested by state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a request in the background.
    Fetch(Request),
    /// Open a URL in the system browser.
    Open(String),
}

/// Startup options.
#[derive(Debug, Clone, Copy)]
pub struct BrowserOptions {
    /// Upper bound for the all-movies release date filter.
    pub today: NaiveDate,
    /// Window of the trending section.
    pub trending_window: TimeWindow,
    /// Cast members kept for the details screen.
    pub cast_limit: usize,
}

/// A horizontally scrolling home section.
#[derive(Debug, Clone)]
pub struct HomeSection {
    /// Heading.
    pub title: &'static str,
    /// Accumulated movies.
    pub paged: PagedFeed,
    /// Scroll state.
    pub carousel: Carousel,
    /// Whether scrolling near the end loads the next page.
    pub load_more: bool,
}

impl HomeSection {
    fn new(title: &'static str, slot: FeedSlot, source: MovieSource, load_more: bool) -> Self {
        Self {
            title,
            paged: PagedFeed::new(slot, Some(source)),
            carousel: Carousel::default(),
            load_more,
        }
    }

    fn items(&self) -> &[Movie] {
        self.paged.feed.items()
    }

    fn selected_movie(&self) -> Option<&Movie> {
        self.items().get(self.carousel.selected)
    }
}

/// Home screen.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// Sections, top to bottom. The first one feeds the hero.
    pub sections: Vec<HomeSection>,
    /// Focused section.
    pub focus: usize,
}

impl HomeState {
    /// Movie shown in the hero banner.
    #[must_use]
    pub fn hero(&self) -> Option<&Movie> {
        self.sections.first()?.items().first()
    }

    fn focused(&self) -> Option<&HomeSection> {
        self.sections.get(self.focus)
    }

    fn focused_mut(&mut self) -> Option<&mut HomeSection> {
        self.sections.get_mut(self.focus)
    }
}

/// A vertical movie list with infinite scrolling.
#[derive(Debug, Clone)]
pub struct MovieList {
    /// Accumulated movies.
    pub paged: PagedFeed,
    /// Cursor.
    pub cursor: ListCursor,
}

impl MovieList {
    fn new(slot: FeedSlot, source: Option<MovieSource>) -> Self {
        Self {
            paged: PagedFeed::new(slot, source),
            cursor: ListCursor::default(),
        }
    }

    /// Loaded movies.
    #[must_use]
    pub fn items(&self) -> &[Movie] {
        self.paged.feed.items()
    }

    /// Movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.items().get(self.cursor.selected())
    }

    fn reset(&mut self, source: MovieSource) -> Option<Request> {
        self.cursor.reset();
        self.paged.reset(source)
    }

    /// Requests the next page when the cursor reached the sentinel.
    fn sentinel_request(&mut self) -> Option<Request> {
        if self.cursor.near_sentinel(self.items().len()) && self.paged.feed.can_load_more() {
            return self.paged.next_request();
        }
        None
    }

    fn key(&mut self, code: KeyCode, page: usize) {
        let len = self.items().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(len),
            KeyCode::PageUp => self.cursor.page_up(page),
            KeyCode::PageDown => self.cursor.page_down(page, len),
            KeyCode::Home | KeyCode::Char('g') => self.cursor.reset(),
            _ => {}
        }
        self.cursor.sync(len);
    }
}

/// Loading state of a one-shot resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Not requested.
    Idle,
    /// In flight.
    Loading,
    /// Loaded.
    Loaded,
    /// Request failed.
    Failed,
}

/// Focused area of the genre screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenresFocus {
    /// Genre chips.
    Chips,
    /// Result list.
    Results,
}

/// Genre browser.
#[derive(Debug, Clone)]
pub struct GenresState {
    /// Available genres.
    pub genres: Vec<Genre>,
    /// Genre list load state.
    pub status: LoadState,
    /// Highlighted chip.
    pub chip: usize,
    /// Genre whose results are shown.
    pub active: Option<Genre>,
    /// Focused area.
    pub focus: GenresFocus,
    /// Results for the active genre.
    pub results: MovieList,
}

/// Search results.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Submitted query.
    pub query: String,
    /// Results.
    pub results: MovieList,
}

/// Details and the credits derived from them.
#[derive(Debug, Clone)]
pub struct LoadedDetails {
    /// Movie details.
    pub details: MovieDetails,
    /// Top-billed cast.
    pub cast: Vec<CastMember>,
    /// Director names.
    pub directors: Vec<String>,
}

/// Details screen content.
#[derive(Debug, Clone)]
pub enum DetailsView {
    /// Requests in flight.
    Loading,
    /// Loaded.
    Loaded(Box<LoadedDetails>),
    /// Details request failed.
    NotFound,
}

/// Details screen.
#[derive(Debug, Clone)]
pub struct DetailsState {
    /// Movie being shown.
    pub movie_id: Option<u64>,
    generation: u64,
    /// Content.
    pub view: DetailsView,
}

/// Trailer dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailerView {
    /// Videos request in flight.
    Loading,
    /// A trailer was found.
    Found {
        /// Video title.
        name: String,
        /// Watch URL.
        url: String,
    },
    /// The movie has no usable trailer.
    NotFound,
    /// The videos request failed.
    Unavailable,
}

/// An open trailer dialog.
#[derive(Debug, Clone)]
pub struct TrailerDialog {
    /// Movie title.
    pub title: String,
    /// Content.
    pub view: TrailerView,
}

/// Top-level browser state.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    route: Vec<Screen>,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search box text.
    pub search_input: String,
    /// Home screen.
    pub home: HomeState,
    /// All movies screen.
    pub movies: MovieList,
    /// Genre screen.
    pub genres: GenresState,
    /// Search screen.
    pub search: SearchState,
    /// Details screen.
    pub details: DetailsState,
    /// Trailer dialog, when open.
    pub trailer: Option<TrailerDialog>,
    trailer_generation: u64,
    /// Rows per page in list screens, measured at draw time.
    pub list_page_size: usize,
    /// One-line message for the footer.
    pub notice: Option<String>,
    cast_limit: usize,
    effects: Vec<Effect>,
}

impl BrowserState {
    /// Creates the browser positioned on the home screen.
    #[must_use]
    pub fn new(options: BrowserOptions) -> Self {
        let trending_title = match options.trending_window {
            TimeWindow::Day => "Trending Today",
            TimeWindow::Week => "Trending This Week",
        };
        let sections = vec![
            HomeSection::new(
                trending_title,
                FeedSlot::Trending,
                MovieSource::Trending(options.trending_window),
                false,
            ),
            HomeSection::new("Popular Movies", FeedSlot::Popular, MovieSource::Popular, true),
            HomeSection::new("Top Rated", FeedSlot::TopRated, MovieSource::TopRated, true),
            HomeSection::new("Coming Soon", FeedSlot::Upcoming, MovieSource::Upcoming, false),
        ];

        Self {
            route: vec![Screen::Home],
            input_mode: InputMode::Normal,
            search_input: String::new(),
            home: HomeState { sections, focus: 0 },
            movies: MovieList::new(
                FeedSlot::Movies,
                Some(MovieSource::ReleasedBefore(options.today)),
            ),
            genres: GenresState {
                genres: Vec::new(),
                status: LoadState::Idle,
                chip: 0,
                active: None,
                focus: GenresFocus::Chips,
                results: MovieList::new(FeedSlot::Genre, None),
            },
            search: SearchState {
                query: String::new(),
                results: MovieList::new(FeedSlot::Search, None),
            },
            details: DetailsState {
                movie_id: None,
                generation: 0,
                view: DetailsView::Loading,
            },
            trailer: None,
            trailer_generation: 0,
            list_page_size: 10,
            notice: None,
            cast_limit: options.cast_limit,
            effects: Vec::new(),
        }
    }

    /// Requests the first page of every home section.
    pub fn start(&mut self) {
        let requests: Vec<Request> = self
            .home
            .sections
            .iter_mut()
            .filter_map(|s| s.paged.start())
            .collect();
        for request in requests {
            self.fetch(Some(request));
        }
    }

    /// Screen on top of the route stack.
    #[must_use]
    pub fn current(&self) -> Screen {
        self.route.last().copied().unwrap_or(Screen::Home)
    }

    /// Route stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.route.len()
    }

    /// Takes the queued effects.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn fetch(&mut self, request: Option<Request>) {
        if let Some(request) = request {
            self.effects.push(Effect::Fetch(request));
        }
    }

    // --- Navigation ---

    /// Pushes a screen (no-op if it is already on top).
    pub fn navigate(&mut self, screen: Screen) {
        if self.current() != screen {
            self.route.push(screen);
        }
        self.on_enter(screen);
    }

    /// Pops the route stack, keeping at least one screen.
    pub fn back(&mut self) {
        if self.route.len() > 1 {
            self.route.pop();
            self.on_enter(self.current());
        }
    }

    /// Switches to a tab screen.
    ///
    /// Home is always the root, so switching to it unwinds the stack. Moving
    /// between Movies and Genres replaces the top entry, which keeps the stack
    /// from growing while cycling tabs.
    pub fn switch_tab(&mut self, screen: Screen) {
        let current = self.current();
        if screen == Screen::Home {
            self.route.truncate(1);
        } else if current != screen && current != Screen::Home && TABS.contains(&current) {
            self.route.pop();
            self.route.push(screen);
        } else if current != screen {
            self.route.push(screen);
        }
        self.on_enter(self.current());
    }

    fn tab_index(&self) -> Option<usize> {
        TABS.iter().position(|&s| s == self.current())
    }

    fn next_tab(&mut self) {
        let next = self
            .tab_index()
            .map(|i| i.saturating_add(1))
            .filter(|&i| i < TABS.len())
            .unwrap_or(0);
        self.switch_tab(TABS.get(next).copied().unwrap_or(Screen::Home));
    }

    fn prev_tab(&mut self) {
        let prev = self
            .tab_index()
            .map_or(0, |i| i.checked_sub(1).unwrap_or(TABS.len().saturating_sub(1)));
        self.switch_tab(TABS.get(prev).copied().unwrap_or(Screen::Home));
    }

    fn on_enter(&mut self, screen: Screen) {
        match screen {
            Screen::Home | Screen::Search => {}
            Screen::Movies => {
                let request = self.movies.paged.start();
                self.fetch(request);
            }
            Screen::Genres => {
                if self.genres.status == LoadState::Idle {
                    self.genres.status = LoadState::Loading;
                    self.fetch(Some(Request::Genres));
                }
            }
            Screen::Details(id) => {
                if self.details.movie_id != Some(id) {
                    self.load_details(id);
                }
            }
        }
    }

    /// Opens the details screen for a movie.
    pub fn open_details(&mut self, movie_id: u64) {
        self.load_details(movie_id);
        self.navigate(Screen::Details(movie_id));
    }

    fn load_details(&mut self, movie_id: u64) {
        self.details.generation = self.details.generation.wrapping_add(1);
        self.details.movie_id = Some(movie_id);
        self.details.view = DetailsView::Loading;
        let generation = self.details.generation;
        self.fetch(Some(Request::Details {
            movie_id,
            generation,
        }));
    }

    /// Submits the search box. Blank queries are ignored.
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let query = self.search_input.trim().to_owned();
        if query.is_empty() {
            return;
        }
        let source = MovieSource::Search(SearchMovieParams::new(query.clone()));
        self.search.query = query;
        let request = self.search.results.reset(source);
        self.fetch(request);
        self.navigate(Screen::Search);
    }

    /// Shows results for the genre under the chip cursor.
    pub fn select_genre(&mut self) {
        let Some(genre) = self.genres.genres.get(self.genres.chip).cloned() else {
            return;
        };
        self.genres.focus = GenresFocus::Results;
        if self.genres.active.as_ref().is_some_and(|g| g.id == genre.id) {
            return;
        }
        let request = self.genres.results.reset(MovieSource::Genre(genre.id));
        self.genres.active = Some(genre);
        self.fetch(request);
    }

    /// Opens the trailer dialog for the focused movie.
    pub fn open_trailer(&mut self) {
        let Some((movie_id, title)) = self.focused_movie() else {
            return;
        };
        self.trailer_generation = self.trailer_generation.wrapping_add(1);
        self.trailer = Some(TrailerDialog {
            title,
            view: TrailerView::Loading,
        });
        let generation = self.trailer_generation;
        self.fetch(Some(Request::Trailer {
            movie_id,
            generation,
        }));
    }

    /// Closes the trailer dialog; a late response is discarded.
    pub fn close_trailer(&mut self) {
        self.trailer = None;
        self.trailer_generation = self.trailer_generation.wrapping_add(1);
    }

    /// ID and title of the movie the cursor is on.
    #[must_use]
    pub fn focused_movie(&self) -> Option<(u64, String)> {
        let movie = match self.current() {
            Screen::Home => self.home.focused()?.selected_movie(),
            Screen::Movies => self.movies.selected_movie(),
            Screen::Genres => match self.genres.focus {
                GenresFocus::Chips => None,
                GenresFocus::Results => self.genres.results.selected_movie(),
            },
            Screen::Search => self.search.results.selected_movie(),
            Screen::Details(id) => {
                let title = match &self.details.view {
                    DetailsView::Loaded(loaded) => loaded.details.title.clone(),
                    DetailsView::Loading | DetailsView::NotFound => String::new(),
                };
                return Some((id, title));
            }
        };
        movie.map(|m| (m.id, m.title.clone()))
    }

    // --- Keys ---

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Control::Quit;
        }
        self.notice = None;

        if self.trailer.is_some() {
            self.handle_trailer_key(key.code);
            return Control::Continue;
        }

        match self.input_mode {
            InputMode::Search => {
                self.handle_search_key(key.code);
                Control::Continue
            }
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_trailer_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q' | 't') => self.close_trailer(),
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(TrailerView::Found { url, .. }) = self.trailer.as_ref().map(|d| &d.view)
                {
                    self.effects.push(Effect::Open(url.clone()));
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.submit_search(),
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => self.search_input.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Tab => self.next_tab(),
            KeyCode::BackTab => self.prev_tab(),
            KeyCode::Char('1') => self.switch_tab(Screen::Home),
            KeyCode::Char('2') => self.switch_tab(Screen::Movies),
            KeyCode::Char('3') => self.switch_tab(Screen::Genres),
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('t') => self.open_trailer(),
            KeyCode::Char('o') => {
                if let Some((id, _)) = self.focused_movie() {
                    self.effects.push(Effect::Open(movie_page_url(id)));
                }
            }
            _ => self.handle_screen_key(code),
        }
        Control::Continue
    }

    fn handle_screen_key(&mut self, code: KeyCode) {
        let page = self.list_page_size;
        match self.current() {
            Screen::Home => self.handle_home_key(code),
            Screen::Movies => {
                if code == KeyCode::Enter {
                    self.open_selected();
                    return;
                }
                self.movies.key(code, page);
                let request = self.movies.sentinel_request();
                self.fetch(request);
            }
            Screen::Genres => self.handle_genres_key(code, page),
            Screen::Search => {
                if code == KeyCode::Enter {
                    self.open_selected();
                    return;
                }
                self.search.results.key(code, page);
                let request = self.search.results.sentinel_request();
                self.fetch(request);
            }
            Screen::Details(_) => {}
        }
    }

    fn handle_home_key(&mut self, code: KeyCode) {
        let last = self.home.sections.len().saturating_sub(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.home.focus = self.home.focus.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.home.focus = self.home.focus.saturating_add(1).min(last);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(section) = self.home.focused_mut() {
                    section.carousel.prev();
                }
            }
            KeyCode::PageUp => {
                if let Some(section) = self.home.focused_mut() {
                    section.carousel.page_left();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let request = self.home.focused_mut().and_then(|section| {
                    let len = section.items().len();
                    section.carousel.next(len);
                    let near_end = section.carousel.near_end(len);
                    edge_request(section, near_end)
                });
                self.fetch(request);
            }
            KeyCode::PageDown => {
                let request = self.home.focused_mut().and_then(|section| {
                    let len = section.items().len();
                    let near_end = section.carousel.page_right(len);
                    edge_request(section, near_end)
                });
                self.fetch(request);
            }
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    fn handle_genres_key(&mut self, code: KeyCode, page: usize) {
        match self.genres.focus {
            GenresFocus::Chips => match code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.genres.chip = self.genres.chip.saturating_sub(1);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if self.genres.chip.saturating_add(1) < self.genres.genres.len() {
                        self.genres.chip = self.genres.chip.saturating_add(1);
                    }
                }
                KeyCode::Enter => self.select_genre(),
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.genres.active.is_some() {
                        self.genres.focus = GenresFocus::Results;
                    }
                }
                _ => {}
            },
            GenresFocus::Results => {
                let at_top = self.genres.results.cursor.selected() == 0;
                match code {
                    KeyCode::Enter => self.open_selected(),
                    KeyCode::Up | KeyCode::Char('k') if at_top => {
                        self.genres.focus = GenresFocus::Chips;
                    }
                    _ => {
                        self.genres.results.key(code, page);
                        let request = self.genres.results.sentinel_request();
                        self.fetch(request);
                    }
                }
            }
        }
    }

    fn open_selected(&mut self) {
        if let Some((id, _)) = self.focused_movie() {
            self.open_details(id);
        }
    }

    fn retry(&mut self) {
        match self.current() {
            Screen::Home => {
                let requests: Vec<Request> = self
                    .home
                    .sections
                    .iter_mut()
                    .filter(|s| s.paged.feed.status() == FeedStatus::Failed)
                    .filter_map(|s| s.paged.retry())
                    .collect();
                for request in requests {
                    self.fetch(Some(request));
                }
            }
            Screen::Movies => {
                let request = self.movies.paged.retry();
                self.fetch(request);
            }
            Screen::Genres => {
                if self.genres.status == LoadState::Failed {
                    self.genres.status = LoadState::Loading;
                    self.fetch(Some(Request::Genres));
                }
                let request = self.genres.results.paged.retry();
                self.fetch(request);
            }
            Screen::Search => {
                let request = self.search.results.paged.retry();
                self.fetch(request);
            }
            Screen::Details(id) => {
                if matches!(self.details.view, DetailsView::NotFound) {
                    self.load_details(id);
                }
            }
        }
    }

    // --- Outcomes ---

    /// Merges a background outcome.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Page {
                slot,
                ticket,
                result,
            } => {
                if let Some(paged) = self.paged_mut(slot) {
                    paged.apply(ticket, result);
                }
                for list in [
                    &mut self.movies,
                    &mut self.genres.results,
                    &mut self.search.results,
                ] {
                    let len = list.items().len();
                    list.cursor.sync(len);
                }
                self.check_sentinel();
            }
            Outcome::Genres(result) => match result {
                Ok(list) => {
                    self.genres.genres = list.genres;
                    self.genres.status = LoadState::Loaded;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "genre list request failed");
                    self.genres.status = LoadState::Failed;
                }
            },
            Outcome::Details {
                movie_id,
                generation,
                details,
                credits,
            } => {
                if generation != self.details.generation {
                    tracing::debug!(movie_id, "discarding stale details");
                    return;
                }
                self.details.view = match details {
                    Ok(details) => {
                        let (cast, directors) = credits.map_or_else(
                            |_| (Vec::new(), Vec::new()),
                            |c| {
                                let cast = c.top_cast(self.cast_limit).into_iter().cloned().collect();
                                let directors =
                                    c.directors().into_iter().map(String::from).collect();
                                (cast, directors)
                            },
                        );
                        DetailsView::Loaded(Box::new(LoadedDetails {
                            details,
                            cast,
                            directors,
                        }))
                    }
                    Err(e) => {
                        tracing::debug!(movie_id, error = %e, "details request failed");
                        DetailsView::NotFound
                    }
                };
            }
            Outcome::Trailer { generation, result } => {
                if generation != self.trailer_generation {
                    tracing::debug!("discarding stale trailer response");
                    return;
                }
                let Some(dialog) = self.trailer.as_mut() else {
                    return;
                };
                dialog.view = match result {
                    Ok(list) => select_trailer(&list.results).map_or(TrailerView::NotFound, |v| {
                        TrailerView::Found {
                            name: v.name.clone().unwrap_or_else(|| String::from("Trailer")),
                            url: trailer_url(v),
                        }
                    }),
                    Err(_) => TrailerView::Unavailable,
                };
            }
        }
    }

    fn paged_mut(&mut self, slot: FeedSlot) -> Option<&mut PagedFeed> {
        match slot {
            FeedSlot::Trending | FeedSlot::Popular | FeedSlot::TopRated | FeedSlot::Upcoming => self
                .home
                .sections
                .iter_mut()
                .map(|s| &mut s.paged)
                .find(|p| p.slot == slot),
            FeedSlot::Movies => Some(&mut self.movies.paged),
            FeedSlot::Genre => Some(&mut self.genres.results.paged),
            FeedSlot::Search => Some(&mut self.search.results.paged),
        }
    }

    /// Re-checks the sentinel of the visible list after new items arrived.
    fn check_sentinel(&mut self) {
        let request = match self.current() {
            Screen::Movies => self.movies.sentinel_request(),
            Screen::Search => self.search.results.sentinel_request(),
            Screen::Genres if self.genres.focus == GenresFocus::Results => {
                self.genres.results.sentinel_request()
            }
            _ => None,
        };
        self.fetch(request);
    }
}

/// Next-page request for a home section whose carousel reached the edge.
fn edge_request(section: &mut HomeSection, near_end: bool) -> Option<Request> {
    if section.load_more && near_end && section.paged.feed.can_load_more() {
        return section.paged.next_request();
    }
    None
}
