//! Background requests for the browser.
//!
//! Screens never await the API. They queue a [`Request`]; the event loop
//! spawns it and the result comes back as an [`Outcome`] over a channel,
//! tagged so that state can tell whether it is still wanted.

use std::sync::Arc;

use anyhow::Result;
use cinescope_api::feed::{Feed, FeedPage, PageTicket};
use cinescope_api::tmdb::{
    GenreList, Movie, MovieCredits, MovieDetails, MovieSource, MoviesPage, TmdbApi, VideoList,
};
use tokio::sync::mpsc::UnboundedSender;

/// Which feed a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSlot {
    /// Home: trending section (also feeds the hero).
    Trending,
    /// Home: popular section.
    Popular,
    /// Home: top rated section.
    TopRated,
    /// Home: coming soon section.
    Upcoming,
    /// All movies by release date.
    Movies,
    /// Genre browser results.
    Genre,
    /// Search results.
    Search,
}

/// A unit of work for the background fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// One page of a movie list.
    Page {
        /// Destination feed.
        slot: FeedSlot,
        /// Endpoint and query.
        source: MovieSource,
        /// Ticket issued by the destination feed.
        ticket: PageTicket,
    },
    /// The genre list.
    Genres,
    /// Details and credits of one movie, fetched together.
    Details {
        /// Movie ID.
        movie_id: u64,
        /// Details screen generation at request time.
        generation: u64,
    },
    /// Videos of one movie, for the trailer dialog.
    Trailer {
        /// Movie ID.
        movie_id: u64,
        /// Dialog generation at request time.
        generation: u64,
    },
}

/// Result of a [`Request`], carrying the same tags.
#[derive(Debug)]
pub enum Outcome {
    /// A movie list page.
    Page {
        /// Destination feed.
        slot: FeedSlot,
        /// Ticket the request was issued with.
        ticket: PageTicket,
        /// Fetched page.
        result: Result<MoviesPage>,
    },
    /// The genre list.
    Genres(Result<GenreList>),
    /// Details and credits.
    Details {
        /// Movie ID.
        movie_id: u64,
        /// Generation the request was issued with.
        generation: u64,
        /// Details response.
        details: Result<MovieDetails>,
        /// Credits response.
        credits: Result<MovieCredits>,
    },
    /// Videos for the trailer dialog.
    Trailer {
        /// Generation the request was issued with.
        generation: u64,
        /// Videos response.
        result: Result<VideoList>,
    },
}

/// A movie feed bound to its destination slot and current source.
#[derive(Debug, Clone)]
pub struct PagedFeed {
    /// Destination slot of requests issued by this feed.
    pub slot: FeedSlot,
    source: Option<MovieSource>,
    /// Accumulated movies.
    pub feed: Feed<Movie>,
}

impl PagedFeed {
    /// Creates a feed. Without a source it issues no requests until [`PagedFeed::reset`].
    #[must_use]
    pub fn new(slot: FeedSlot, source: Option<MovieSource>) -> Self {
        Self {
            slot,
            source,
            feed: Feed::new(),
        }
    }

    /// Current source.
    #[must_use]
    pub const fn source(&self) -> Option<&MovieSource> {
        self.source.as_ref()
    }

    /// Issues a request for the next page, if the feed allows one.
    ///
    /// Sources that serve a single page never get a second request.
    pub fn next_request(&mut self) -> Option<Request> {
        let source = self.source.clone()?;
        if !source.is_paged() && self.feed.pages_loaded() > 0 {
            return None;
        }
        let ticket = self.feed.begin_fetch()?;
        Some(Request::Page {
            slot: self.slot,
            source,
            ticket,
        })
    }

    /// Issues the first request if nothing has been requested yet.
    pub fn start(&mut self) -> Option<Request> {
        if self.feed.pages_loaded() > 0 || self.feed.is_fetching() {
            return None;
        }
        self.next_request()
    }

    /// Switches to a new source and requests its first page.
    pub fn reset(&mut self, source: MovieSource) -> Option<Request> {
        self.feed.reset();
        self.source = Some(source);
        self.next_request()
    }

    /// Clears a failure and retries.
    pub fn retry(&mut self) -> Option<Request> {
        self.feed.clear_error();
        self.next_request()
    }

    /// Applies a page outcome.
    pub fn apply(&mut self, ticket: PageTicket, result: Result<MoviesPage>) {
        match result {
            Ok(page) => {
                self.feed.accept(ticket, FeedPage::from(page));
            }
            Err(e) => {
                if self.feed.fail(ticket, format!("{e:#}")) {
                    tracing::debug!(slot = ?self.slot, error = %e, "page request failed");
                }
            }
        }
    }
}

/// Runs a request to completion.
pub async fn execute<A: TmdbApi + Sync>(api: &A, request: Request) -> Outcome {
    match request {
        Request::Page {
            slot,
            source,
            ticket,
        } => Outcome::Page {
            slot,
            ticket,
            result: source.fetch(api, ticket.page).await,
        },
        Request::Genres => Outcome::Genres(api.genres().await),
        Request::Details {
            movie_id,
            generation,
        } => {
            let (details, credits) =
                tokio::join!(api.movie_details(movie_id), api.movie_credits(movie_id));
            Outcome::Details {
                movie_id,
                generation,
                details,
                credits,
            }
        }
        Request::Trailer {
            movie_id,
            generation,
        } => Outcome::Trailer {
            generation,
            result: api.movie_videos(movie_id).await,
        },
    }
}

/// Spawns a request; its outcome is sent to `tx`.
pub fn spawn<A>(api: Arc<A>, request: Request, tx: UnboundedSender<Outcome>)
where
    A: TmdbApi + Sync + 'static,
{
    tokio::spawn(async move {
        let outcome = execute(api.as_ref(), request).await;
        // The receiver only goes away when the browser is shutting down.
        let _ = tx.send(outcome);
    });
}
