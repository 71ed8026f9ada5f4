//! TUI rendering logic for the browser.

use cinescope_api::feed::FeedStatus;
use cinescope_api::tmdb::{Movie, backdrop_url, movie_page_url, poster_url};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Tabs, Wrap};

use super::state::{
    BrowserState, DetailsView, GenresFocus, HomeSection, InputMode, LoadState, LoadedDetails,
    MovieList, Screen, TABS, TrailerView,
};

/// Width of a carousel card, borders included.
const CARD_WIDTH: u16 = 26;

/// Height of a home section: heading plus a bordered card.
const SECTION_HEIGHT: u16 = 5;

/// Cards shown while a section's first page loads.
const SKELETON_CARDS: usize = 5;

/// Formats a number with thousands separators (e.g. 26411 -> "26,411").
#[allow(clippy::arithmetic_side_effects)]
pub fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Formats a vote average with one decimal.
pub fn fmt_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

/// Formats a dollar amount; TMDB reports unknown amounts as 0.
pub fn fmt_money(amount: u64) -> String {
    if amount == 0 {
        return String::from("-");
    }
    format!("${}", fmt_num(amount))
}

/// Formats a runtime in minutes.
pub fn fmt_runtime(runtime: Option<u32>) -> String {
    runtime
        .filter(|&m| m > 0)
        .map_or_else(|| String::from("-"), |m| format!("{m} min"))
}

/// Truncates to `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

fn year(movie: &Movie) -> String {
    movie
        .release_year()
        .map_or_else(|| String::from("----"), |y| y.to_string())
}

fn heading_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Draws the browser.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // navbar
            Constraint::Min(5),    // screen
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_navbar(frame, chunks[0], state);

    match state.current() {
        Screen::Home => draw_home(frame, chunks[1], state),
        Screen::Movies => {
            let area = chunks[1];
            state.list_page_size = page_size(area);
            let title = " All Movies - latest releases sorted by date ";
            draw_movie_list(frame, area, title, &mut state.movies, true);
        }
        Screen::Genres => draw_genres(frame, chunks[1], state),
        Screen::Search => draw_search(frame, chunks[1], state),
        Screen::Details(_) => draw_details(frame, chunks[1], state),
    }

    draw_footer(frame, chunks[2], state);

    if state.trailer.is_some() {
        draw_trailer(frame, state);
    }
}

/// Rows of a list that fit on one page (block borders and header excluded).
fn page_size(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(4)).max(1)
}

/// Draws the tab bar and the search box.
#[allow(clippy::indexing_slicing)]
fn draw_navbar(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)])
        .split(area);

    let titles = ["1 Home", "2 Movies", "3 Genres"];
    let selected = TABS.iter().position(|&s| s == state.current());
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(" cinescope "))
        .highlight_style(highlight_style());
    frame.render_widget(tabs, chunks[0]);

    let searching = state.input_mode == InputMode::Search;
    let (text, style) = if searching {
        (format!("{}_", state.search_input), Style::default().fg(Color::Yellow))
    } else if state.search_input.is_empty() {
        (String::from("Search movies..."), dim_style())
    } else {
        (state.search_input.clone(), Style::default())
    };
    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, chunks[1]);
}

// --- Home ---

#[allow(clippy::indexing_slicing)]
fn draw_home(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let mut constraints = vec![Constraint::Length(7)];
    constraints.extend(
        state
            .home
            .sections
            .iter()
            .map(|_| Constraint::Length(SECTION_HEIGHT)),
    );
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_hero(frame, chunks[0], state);

    let focus = state.home.focus;
    for (i, section) in state.home.sections.iter_mut().enumerate() {
        if let Some(&rect) = chunks.get(i.saturating_add(1)) {
            draw_section(frame, rect, section, i == focus);
        }
    }
}

fn draw_hero(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default().borders(Borders::ALL).title(" Featured ");
    let lines = match state.home.hero() {
        Some(movie) => vec![
            Line::from(Span::styled(
                movie.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw(year(movie)),
                Span::raw("  \u{2605} "),
                Span::styled(fmt_rating(movie.vote_average), heading_style()),
                Span::styled(
                    format!("  ({} votes)", fmt_num(u64::from(movie.vote_count))),
                    dim_style(),
                ),
            ]),
            Line::from(movie.overview.clone().unwrap_or_default()),
        ],
        None => {
            let text = match state.home.sections.first().map(|s| s.paged.feed.status()) {
                Some(FeedStatus::Failed) => "Failed to load trending movies. r: retry",
                _ => "Loading...",
            };
            vec![Line::from(Span::styled(text, dim_style()))]
        }
    };
    let hero = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(hero, area);
}

#[allow(clippy::indexing_slicing)]
fn draw_section(frame: &mut Frame, area: Rect, section: &mut HomeSection, focused: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let marker = if focused { "\u{25b8} " } else { "  " };
    let title_style = if focused {
        highlight_style()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{marker}{}", section.title),
            title_style,
        ))),
        rows[0],
    );

    let visible = usize::from((rows[1].width / CARD_WIDTH).max(1));
    section.carousel.set_visible(visible);

    let feed = &section.paged.feed;
    let status = feed.status();
    if status == FeedStatus::Failed && feed.is_empty() {
        let msg = Paragraph::new(Span::styled("Failed to load. r: retry", dim_style()));
        frame.render_widget(msg, rows[1]);
        return;
    }

    let mut cards: Vec<(Vec<Line>, Style)> = if feed.is_empty() {
        let count = if status == FeedStatus::Loading {
            SKELETON_CARDS.min(visible)
        } else {
            0
        };
        (0..count)
            .map(|_| {
                (
                    vec![Line::from("\u{2591}".repeat(12)), Line::from("\u{2591}".repeat(6))],
                    dim_style(),
                )
            })
            .collect()
    } else {
        let items = feed.items();
        section
            .carousel
            .window(items.len())
            .filter_map(|i| items.get(i).map(|m| (i, m)))
            .map(|(i, movie)| {
                let style = if focused && i == section.carousel.selected {
                    highlight_style()
                } else {
                    Style::default()
                };
                let inner = usize::from(CARD_WIDTH.saturating_sub(2));
                (
                    vec![
                        Line::from(truncate(&movie.title, inner)),
                        Line::from(format!(
                            "{}  \u{2605} {}",
                            year(movie),
                            fmt_rating(movie.vote_average)
                        )),
                    ],
                    style,
                )
            })
            .collect()
    };

    let at_end = section.carousel.window(feed.len()).end >= feed.len();
    if status == FeedStatus::LoadingMore && at_end && cards.len() < visible {
        cards.push((vec![Line::from("Loading...")], dim_style()));
    }

    let constraints: Vec<Constraint> = cards.iter().map(|_| Constraint::Length(CARD_WIDTH)).collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(rows[1]);
    for ((lines, style), rect) in cards.into_iter().zip(slots.iter()) {
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style),
        );
        frame.render_widget(card, *rect);
    }
}

// --- Lists ---

fn movie_row(movie: &Movie) -> Row<'static> {
    Row::new(vec![
        movie.title.clone(),
        year(movie),
        format!("\u{2605} {}", fmt_rating(movie.vote_average)),
        fmt_num(u64::from(movie.vote_count)),
        movie.release_date.clone().unwrap_or_default(),
    ])
}

/// Draws a paged movie table with loading, error, and end-of-list rows.
fn draw_movie_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    list: &mut MovieList,
    focused: bool,
) {
    let feed = &list.paged.feed;
    let mut rows: Vec<Row> = feed.items().iter().map(movie_row).collect();

    match feed.status() {
        FeedStatus::Loading => rows.push(Row::new(vec!["Loading..."]).style(dim_style())),
        FeedStatus::LoadingMore => rows.push(Row::new(vec!["Loading more..."]).style(dim_style())),
        FeedStatus::Failed => rows.push(
            Row::new(vec!["Failed to load. r: retry"]).style(Style::default().fg(Color::Red)),
        ),
        FeedStatus::Ready if feed.is_exhausted() && !feed.is_empty() => {
            rows.push(Row::new(vec!["You've reached the end!"]).style(dim_style()));
        }
        FeedStatus::Idle | FeedStatus::Ready => {}
    }

    let header = Row::new(vec!["Title", "Year", "Rating", "Votes", "Released"])
        .style(heading_style())
        .bottom_margin(1);
    let widths = [
        Constraint::Min(30),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
    ];
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_owned())
                .border_style(border_style),
        )
        .row_highlight_style(highlight_style());

    frame.render_stateful_widget(table, area, &mut list.cursor.table);
}

#[allow(clippy::indexing_slicing)]
fn draw_genres(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let genres = &state.genres;
    let chips_focused = genres.focus == GenresFocus::Chips;
    let chip_line = match genres.status {
        LoadState::Idle | LoadState::Loading => Line::from(Span::styled("Loading genres...", dim_style())),
        LoadState::Failed => Line::from(Span::styled(
            "Failed to load genres. r: retry",
            Style::default().fg(Color::Red),
        )),
        LoadState::Loaded => {
            let mut spans = Vec::new();
            for (i, genre) in genres.genres.iter().enumerate() {
                let active = genres.active.as_ref().is_some_and(|g| g.id == genre.id);
                let mut style = if active {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                if chips_focused && i == genres.chip {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(format!(" {} ", genre.name), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        }
    };
    let chip_border = if chips_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let chips = Paragraph::new(chip_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Genres ")
            .border_style(chip_border),
    );
    frame.render_widget(chips, chunks[0]);

    let Some(active) = state.genres.active.clone() else {
        let empty = Paragraph::new(Span::styled("Select a genre to start browsing", dim_style()))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
        return;
    };

    state.list_page_size = page_size(chunks[1]);
    let title = format!(" {} ", active.name);
    draw_movie_list(
        frame,
        chunks[1],
        &title,
        &mut state.genres.results,
        !chips_focused,
    );
}

#[allow(clippy::indexing_slicing)]
fn draw_search(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let feed = &state.search.results.paged.feed;
    let summary = match feed.status() {
        FeedStatus::Idle | FeedStatus::Loading => String::from("Searching..."),
        FeedStatus::Failed if feed.is_empty() => String::from("Search failed. r: retry"),
        _ if feed.is_empty() => format!("No results found for \"{}\"", state.search.query),
        _ => format!(
            "Found {} results",
            fmt_num(u64::from(feed.total_results().unwrap_or(0)))
        ),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(summary, heading_style())),
        chunks[0],
    );

    state.list_page_size = page_size(chunks[1]);
    let title = format!(" Search results for \"{}\" ", state.search.query);
    draw_movie_list(frame, chunks[1], &title, &mut state.search.results, true);
}

// --- Details ---

fn draw_details(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default().borders(Borders::ALL).title(" Movie ");
    let lines = match &state.details.view {
        DetailsView::Loading => vec![Line::from(Span::styled("Loading...", dim_style()))],
        DetailsView::NotFound => vec![
            Line::from(Span::styled(
                "Movie not found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Esc: back  r: retry", dim_style())),
        ],
        DetailsView::Loaded(loaded) => details_lines(loaded),
    };
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("{name}: "), heading_style())
}

fn details_lines(loaded: &LoadedDetails) -> Vec<Line<'static>> {
    let d = &loaded.details;
    let mut lines = vec![Line::from(Span::styled(
        d.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(tagline) = d.tagline() {
        lines.push(Line::from(Span::styled(
            tagline.to_owned(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("\u{2605} "),
        Span::styled(fmt_rating(d.vote_average), heading_style()),
        Span::raw(format!(" ({} votes)", fmt_num(u64::from(d.vote_count)))),
        Span::raw("   "),
        Span::raw(d.release_date.clone().unwrap_or_else(|| String::from("-"))),
        Span::raw("   "),
        Span::raw(fmt_runtime(d.runtime)),
    ]));
    if !d.genres.is_empty() {
        lines.push(Line::from(vec![label("Genres"), Span::raw(d.genre_names())]));
    }
    if !loaded.directors.is_empty() {
        lines.push(Line::from(vec![
            label("Director"),
            Span::raw(loaded.directors.join(", ")),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Overview", heading_style())));
    lines.push(Line::from(d.overview.clone().unwrap_or_default()));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        label("Budget"),
        Span::raw(fmt_money(d.budget)),
        Span::raw("   "),
        label("Revenue"),
        Span::raw(fmt_money(d.revenue)),
        Span::raw("   "),
        label("Status"),
        Span::raw(d.status.clone().unwrap_or_else(|| String::from("-"))),
    ]));

    if !loaded.cast.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Cast", heading_style())));
        for member in &loaded.cast {
            let character = member
                .character
                .as_deref()
                .filter(|c| !c.is_empty())
                .map_or_else(String::new, |c| format!(" as {c}"));
            lines.push(Line::from(format!("  {}{character}", member.name)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![label("TMDB"), Span::raw(movie_page_url(d.id))]));
    if let Some(url) = poster_url(d.poster_path.as_deref()) {
        lines.push(Line::from(vec![label("Poster"), Span::styled(url, dim_style())]));
    }
    if let Some(url) = backdrop_url(d.backdrop_path.as_deref()) {
        lines.push(Line::from(vec![label("Backdrop"), Span::styled(url, dim_style())]));
    }
    lines
}

// --- Overlays ---

/// Centers a `width` x `height` rectangle inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

fn draw_trailer(frame: &mut Frame, state: &BrowserState) {
    let Some(dialog) = &state.trailer else {
        return;
    };
    let area = centered(frame.area(), 70, 7);

    let lines = match &dialog.view {
        TrailerView::Loading => vec![Line::from(Span::styled("Loading trailer...", dim_style()))],
        TrailerView::Found { name, url } => vec![
            Line::from(Span::styled(name.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(url.clone(), highlight_style())),
            Line::from(""),
            Line::from(Span::styled("o: open in browser  Esc: close", dim_style())),
        ],
        TrailerView::NotFound => vec![Line::from("No trailer found")],
        TrailerView::Unavailable => vec![Line::from("Trailer not available")],
    };

    let title = if dialog.title.is_empty() {
        String::from(" Trailer ")
    } else {
        format!(" {} - Trailer ", dialog.title)
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let hints = if state.trailer.is_some() {
        "o: open  Esc: close"
    } else if state.input_mode == InputMode::Search {
        "Type to search | Enter: search | Esc: cancel"
    } else {
        match state.current() {
            Screen::Home => {
                "\u{2191}\u{2193}: section  \u{2190}\u{2192}: move  PgUp/PgDn: scroll  Enter: details  t: trailer  /: search  Tab: next  q: quit"
            }
            Screen::Movies | Screen::Search => {
                "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  Enter: details  t: trailer  o: open  Esc: back  q: quit"
            }
            Screen::Genres => {
                "\u{2190}\u{2192}: genre  Enter: select/details  \u{2191}\u{2193}: move  t: trailer  Esc: back  q: quit"
            }
            Screen::Details(_) => "t: trailer  o: open on TMDB  Esc: back  q: quit",
        }
    };

    let line = state.notice.as_ref().map_or_else(
        || Line::from(hints),
        |notice| Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Red))),
    );
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
