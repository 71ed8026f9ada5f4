//! Incremental feed accumulation.
//!
//! A [`Feed`] holds every item fetched so far for one query (a list endpoint,
//! a genre, a search string), page by page:
//!
//! - items are deduplicated by [`Keyed::key`]; the first occurrence wins and
//!   keeps its position, later duplicates are dropped.
//! - at most one page request is outstanding; [`Feed::begin_fetch`] hands out
//!   a [`PageTicket`] and refuses while one is in flight.
//! - [`Feed::reset`] starts a new generation. Tickets from an older generation
//!   are stale and their responses are discarded.

use std::collections::HashSet;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use anyhow::{Context, Result};

use crate::tmdb::{Movie, MoviesPage};

/// Highest page number TMDB will serve for list endpoints.
pub const MAX_PAGE: u32 = 500;

/// Items that can be deduplicated by an identifier.
pub trait Keyed {
    /// Identifier type.
    type Key: Eq + Hash + Clone + Debug;

    /// Returns the item's identifier.
    fn key(&self) -> Self::Key;
}

/// Handle for one outstanding page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    /// Feed generation the request belongs to.
    pub generation: u64,
    /// Requested page (1-based).
    pub page: u32,
}

/// One page of results, independent of the endpoint it came from.
#[derive(Debug, Clone)]
pub struct FeedPage<T> {
    /// Page number.
    pub page: u32,
    /// Total pages reported by the API.
    pub total_pages: u32,
    /// Total results reported by the API.
    pub total_results: u32,
    /// Items on this page.
    pub items: Vec<T>,
}

impl From<MoviesPage> for FeedPage<Movie> {
    fn from(page: MoviesPage) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            items: page.results,
        }
    }
}

/// Coarse feed state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing requested yet.
    Idle,
    /// First page in flight.
    Loading,
    /// A later page in flight; earlier pages are shown.
    LoadingMore,
    /// At least one page loaded, nothing in flight.
    Ready,
    /// The last request failed.
    Failed,
}

/// What happened to a delivered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// The page was merged.
    Applied {
        /// Items appended.
        added: usize,
        /// Duplicates dropped.
        skipped: usize,
    },
    /// The ticket no longer matches; the page was discarded.
    Stale,
}

/// Ordered, deduplicated accumulator over paged results.
#[derive(Debug, Clone)]
pub struct Feed<T: Keyed> {
    items: Vec<T>,
    seen: HashSet<T::Key>,
    generation: u64,
    next_page: u32,
    has_more: bool,
    pages_loaded: u32,
    total_results: Option<u32>,
    in_flight: Option<PageTicket>,
    error: Option<String>,
}

impl<T: Keyed> Default for Feed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> Feed<T> {
    /// Creates an empty feed positioned at page 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            generation: 0,
            next_page: 1,
            has_more: true,
            pages_loaded: 0,
            total_results: None,
            in_flight: None,
            error: None,
        }
    }

    /// Accumulated items in first-seen order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of accumulated items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the API reported further pages.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Number of pages merged in this generation.
    #[must_use]
    pub const fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// Total result count reported by the last page.
    #[must_use]
    pub const fn total_results(&self) -> Option<u32> {
        self.total_results
    }

    /// Error message of the last failed request.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a page request is outstanding.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// At least one page loaded and the API has no more.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.pages_loaded > 0 && !self.has_more
    }

    /// Whether a "load more" trigger should fire a request now.
    #[must_use]
    pub const fn can_load_more(&self) -> bool {
        self.has_more && self.in_flight.is_none() && self.error.is_none()
    }

    /// Coarse state for rendering.
    #[must_use]
    pub const fn status(&self) -> FeedStatus {
        if self.error.is_some() {
            return FeedStatus::Failed;
        }
        match (self.in_flight.is_some(), self.pages_loaded) {
            (true, 0) => FeedStatus::Loading,
            (true, _) => FeedStatus::LoadingMore,
            (false, 0) => FeedStatus::Idle,
            (false, _) => FeedStatus::Ready,
        }
    }

    /// Starts a request for the next page.
    ///
    /// Returns `None` while a request is outstanding, after the last page, or
    /// after a failure (see [`Feed::clear_error`]).
    pub fn begin_fetch(&mut self) -> Option<PageTicket> {
        if !self.can_load_more() {
            return None;
        }
        let ticket = PageTicket {
            generation: self.generation,
            page: self.next_page,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Returns `true` if `ticket` is the request this feed is waiting for.
    #[must_use]
    pub fn is_current(&self, ticket: PageTicket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Merges a delivered page.
    ///
    /// Items whose key is already present are skipped. A page for a ticket
    /// that is not the outstanding one is discarded.
    pub fn accept(&mut self, ticket: PageTicket, page: FeedPage<T>) -> Merge {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                page = ticket.page,
                "discarding stale page"
            );
            return Merge::Stale;
        }
        self.in_flight = None;

        let delivered = page.items.len();
        let before = self.items.len();
        for item in page.items {
            if self.seen.insert(item.key()) {
                self.items.push(item);
            }
        }
        let added = self.items.len().saturating_sub(before);

        let last_page = page.total_pages.min(MAX_PAGE);
        self.has_more = page.page < last_page;
        self.next_page = page.page.saturating_add(1);
        self.pages_loaded = self.pages_loaded.saturating_add(1);
        self.total_results = Some(page.total_results);

        Merge::Applied {
            added,
            skipped: delivered.saturating_sub(added),
        }
    }

    /// Records a failed request. Returns `false` for a stale ticket.
    pub fn fail(&mut self, ticket: PageTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        self.error = Some(message.into());
        true
    }

    /// Clears a recorded failure so the next trigger retries.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Discards everything and starts a new generation.
    ///
    /// Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.generation = self.generation.wrapping_add(1);
        self.next_page = 1;
        self.has_more = true;
        self.pages_loaded = 0;
        self.total_results = None;
        self.in_flight = None;
        self.error = None;
    }
}

/// Pulls up to `max_pages` pages into `feed`, stopping early after the last page.
///
/// # Errors
///
/// Returns an error if any page request fails.
pub async fn collect_pages<T, F, Fut>(feed: &mut Feed<T>, max_pages: u32, mut fetch: F) -> Result<()>
where
    T: Keyed,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<FeedPage<T>>>,
{
    for _ in 0..max_pages {
        let Some(ticket) = feed.begin_fetch() else {
            break;
        };
        let page = fetch(ticket.page)
            .await
            .with_context(|| format!("failed to fetch page {}", ticket.page))?;
        if let Merge::Applied { added, skipped } = feed.accept(ticket, page) {
            tracing::info!(page = ticket.page, added, skipped, "page merged");
        }
    }
    Ok(())
}
