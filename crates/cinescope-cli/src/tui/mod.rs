//! Interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Requests run as tokio tasks
//! and report back over a channel, so the screen never blocks on the network.

/// Request execution and paged feed slots.
pub mod fetch;
mod scroll;
/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use cinescope_api::tmdb::TmdbApi;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, instrument, warn};

use self::fetch::Outcome;
use self::state::{BrowserOptions, BrowserState, Control, Effect};

/// Runs the movie browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing, or event handling fails.
#[allow(clippy::module_name_repetitions)]
#[instrument(skip_all)]
pub async fn run_browser<A>(api: Arc<A>, options: BrowserOptions) -> Result<()>
where
    A: TmdbApi + Sync + 'static,
{
    let mut state = BrowserState::new(options);
    state.start();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let (tx, rx) = mpsc::unbounded_channel::<Outcome>();
    let result = run_event_loop(&mut terminal, &mut state, &api, &tx, rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    api: &Arc<A>,
    tx: &UnboundedSender<Outcome>,
    mut rx: UnboundedReceiver<Outcome>,
) -> Result<()>
where
    A: TmdbApi + Sync + 'static,
{
    let mut events = EventStream::new();

    loop {
        dispatch_effects(state, api, tx);

        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    return Ok(());
                };
                if let Event::Key(key) = event.context("failed to read event")?
                    && key.kind == KeyEventKind::Press
                    && state.handle_key(key) == Control::Quit
                {
                    return Ok(());
                }
            }
            Some(outcome) = rx.recv() => state.apply(outcome),
        }
    }
}

/// Runs the effects queued by the last key press or outcome.
fn dispatch_effects<A>(state: &mut BrowserState, api: &Arc<A>, tx: &UnboundedSender<Outcome>)
where
    A: TmdbApi + Sync + 'static,
{
    for effect in state.drain_effects() {
        match effect {
            Effect::Fetch(request) => {
                debug!(?request, "dispatching request");
                fetch::spawn(Arc::clone(api), request, tx.clone());
            }
            Effect::Open(url) => {
                if let Err(e) = open::that(&url) {
                    warn!(url = %url, error = %e, "failed to open browser");
                    state.notice = Some(format!("Could not open {url}: {e}"));
                }
            }
        }
    }
}
