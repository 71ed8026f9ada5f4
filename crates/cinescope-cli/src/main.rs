//! cinescope - movie discovery CLI and terminal browser backed by TMDB.

/// Application configuration (TOML).
mod config;
/// Terminal movie browser.
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbConfig, resolve_config_path};
use crate::tui::run_browser;
use crate::tui::state::BrowserOptions;
use cinescope_api::feed::{Feed, FeedPage, MAX_PAGE, collect_pages};
use cinescope_api::tmdb::{
    ImageSize, LocalTmdbApi, Movie, MovieSource, SearchMovieParams, TimeWindow, TmdbClient,
    image_url, movie_page_url, profile_url, select_trailer, trailer_url,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "cinescope", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query TMDB API.
    Tmdb(TmdbCommand),
    /// Browse movies in the terminal.
    Browse,
    /// Manage the configuration file.
    Config(ConfigCommand),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration with secrets masked.
    Show,
    /// Write a default configuration file.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: clap_complete::Shell,
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// Response language (e.g. "en-US"). Overrides `[tmdb] language`.
    #[arg(long, global = true)]
    language: Option<String>,

    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// Trending movies.
    Trending(TrendingArgs),
    /// Popular movies.
    Popular(ListArgs),
    /// Top rated movies.
    TopRated(ListArgs),
    /// Movies now in theaters.
    NowPlaying(ListArgs),
    /// Upcoming movies.
    Upcoming(ListArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// List movie genres.
    Genres,
    /// Discover movies of a genre, most popular first.
    Discover(DiscoverArgs),
    /// Latest releases, newest first.
    Latest(LatestArgs),
    /// Movie details.
    Details(IdArgs),
    /// Movie cast and directors.
    Credits(CreditsArgs),
    /// Movie videos.
    Videos(IdArgs),
    /// Best trailer for a movie.
    Trailer(TrailerArgs),
    /// Build an image URL from a TMDB file path.
    Image(ImageArgs),
}

/// Page selection shared by list subcommands.
#[derive(clap::Args)]
struct ListArgs {
    /// Page to fetch.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    page: u32,
    /// Fetch this many pages from the first, dropping duplicates.
    #[arg(long, conflicts_with = "page", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    pages: Option<u32>,
}

/// Arguments for the `tmdb trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Time window ("day" or "week").
    #[arg(long, default_value = "week")]
    window: TimeWindow,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "The Matrix").
    #[arg(long, required = true)]
    query: String,
    /// Filter by release year.
    #[arg(long)]
    year: Option<u32>,
    /// Include adult titles.
    #[arg(long)]
    include_adult: bool,
    /// Page selection.
    #[command(flatten)]
    list: ListArgs,
}

/// Arguments for the `tmdb discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Genre ID (see `tmdb genres`).
    #[arg(long, required = true)]
    genre: u32,
    /// Page selection.
    #[command(flatten)]
    list: ListArgs,
}

/// Arguments for the `tmdb latest` subcommand.
#[derive(clap::Args)]
struct LatestArgs {
    /// Only movies released on or before this date (default: today).
    #[arg(long)]
    until: Option<NaiveDate>,
    /// Page selection.
    #[command(flatten)]
    list: ListArgs,
}

/// Movie ID argument.
#[derive(clap::Args)]
struct IdArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `tmdb credits` subcommand.
#[derive(clap::Args)]
struct CreditsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Cast members to show (default: `[browser] cast_limit`).
    #[arg(long)]
    limit: Option<usize>,
}

/// Arguments for the `tmdb trailer` subcommand.
#[derive(clap::Args)]
struct TrailerArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Open the trailer in the system browser.
    #[arg(long)]
    open: bool,
}

/// Arguments for the `tmdb image` subcommand.
#[derive(clap::Args)]
struct ImageArgs {
    /// File path from an API response (e.g. "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg").
    #[arg(long, required = true)]
    path: String,
    /// Image size (w300, w500, w780, w1280, original).
    #[arg(long, default_value = "w500")]
    size: ImageSize,
}

// --- Config & client ---

/// Loads config and applies `TMDB_API_KEY` / `TMDB_API_TOKEN` overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    config.tmdb.apply_env_overrides(
        std::env::var("TMDB_API_KEY").ok(),
        std::env::var("TMDB_API_TOKEN").ok(),
    );
    Ok(config)
}

/// Builds a `TmdbClient` from config.
///
/// # Errors
///
/// Returns an error if no credential is configured or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig, language: Option<&str>) -> Result<TmdbClient> {
    let credential = config.credential().context(
        "a TMDB credential is required: set TMDB_API_KEY or TMDB_API_TOKEN, \
         or add api_key/access_token to [tmdb] in config.toml",
    )?;

    let mut builder = TmdbClient::builder()
        .credential(credential)
        .min_interval(config.min_interval())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(language) = language.or(config.language.as_deref()) {
        builder = builder.language(language);
    }
    builder.build().context("failed to build TMDB client")
}

// --- tmdb subcommands ---

/// Prints a movie table.
fn print_movies(movies: &[Movie]) {
    tracing::info!("ID\tRating\tVotes\tReleaseDate\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{:.1}\t{}\t{}\t{}",
            movie.id,
            movie.vote_average,
            movie.vote_count,
            movie.release_date.as_deref().filter(|d| !d.is_empty()).unwrap_or("-"),
            movie.title,
        );
    }
}

/// Runs a list subcommand for `source`.
///
/// With `--pages`, accumulates pages through a deduplicating feed.
///
/// # Errors
///
/// Returns an error if any page request fails.
#[instrument(skip_all, fields(source = %source))]
async fn run_tmdb_list(client: &TmdbClient, source: &MovieSource, args: &ListArgs) -> Result<()> {
    if let Some(pages) = args.pages {
        let mut feed = Feed::new();
        collect_pages(&mut feed, pages, |page| async move {
            source.fetch(client, page).await.map(FeedPage::from)
        })
        .await
        .with_context(|| format!("TMDB {source} request failed"))?;

        print_movies(feed.items());
        tracing::info!(
            "Total: {} movies from {} page(s) ({} results)",
            feed.len(),
            feed.pages_loaded(),
            feed.total_results().unwrap_or(0)
        );
        return Ok(());
    }

    let page = source
        .fetch(client, args.page)
        .await
        .with_context(|| format!("TMDB {source} request failed"))?;
    print_movies(&page.results);
    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    if let Some(next) = page.next_page().filter(|&n| n <= MAX_PAGE) {
        tracing::info!("Next: --page {next}");
    }
    Ok(())
}

/// Runs the `tmdb trending` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_trending(client: &TmdbClient, args: &TrendingArgs) -> Result<()> {
    let page = client
        .trending(args.window)
        .await
        .context("TMDB trending request failed")?;
    print_movies(&page.results);
    tracing::info!("Total: {} movies", page.results.len());
    Ok(())
}

/// Runs the `tmdb genres` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_genres(client: &TmdbClient) -> Result<()> {
    let list = client.genres().await.context("TMDB genres request failed")?;
    tracing::info!("ID\tName");
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    Ok(())
}

/// Runs the `tmdb details` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_tmdb_details(client: &TmdbClient, args: &IdArgs) -> Result<()> {
    let d = client
        .movie_details(args.id)
        .await
        .context("TMDB movie details request failed")?;

    tracing::info!("ID: {}", d.id);
    tracing::info!("Title: {}", d.title);
    if let Some(tagline) = d.tagline() {
        tracing::info!("Tagline: {tagline}");
    }
    tracing::info!("Release Date: {}", d.release_date.as_deref().unwrap_or("-"));
    tracing::info!(
        "Runtime: {}",
        d.runtime
            .map_or_else(|| String::from("-"), |r| format!("{r} min"))
    );
    tracing::info!("Rating: {:.1} ({} votes)", d.vote_average, d.vote_count);
    tracing::info!("Genres: {}", d.genre_names());
    tracing::info!("Status: {}", d.status.as_deref().unwrap_or("-"));
    tracing::info!("Budget: {}", d.budget);
    tracing::info!("Revenue: {}", d.revenue);
    tracing::info!("Overview: {}", d.overview.as_deref().unwrap_or("-"));
    tracing::info!("URL: {}", movie_page_url(d.id));
    Ok(())
}

/// Runs the `tmdb credits` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_tmdb_credits(client: &TmdbClient, args: &CreditsArgs, default_limit: usize) -> Result<()> {
    let credits = client
        .movie_credits(args.id)
        .await
        .context("TMDB movie credits request failed")?;

    let directors = credits.directors();
    tracing::info!(
        "Director: {}",
        if directors.is_empty() {
            String::from("-")
        } else {
            directors.join(", ")
        }
    );
    tracing::info!("Cast:");
    for member in credits.top_cast(args.limit.unwrap_or(default_limit)) {
        tracing::info!(
            "  {}\t{}\t{}",
            member.name,
            member.character.as_deref().unwrap_or("-"),
            profile_url(member.profile_path.as_deref()).unwrap_or_else(|| String::from("-")),
        );
    }
    Ok(())
}

/// Runs the `tmdb videos` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_tmdb_videos(client: &TmdbClient, args: &IdArgs) -> Result<()> {
    let videos = client
        .movie_videos(args.id)
        .await
        .context("TMDB movie videos request failed")?;

    tracing::info!("Site\tType\tOfficial\tKey\tName");
    for video in &videos.results {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            video.site,
            video.video_type,
            video.official,
            video.key,
            video.name.as_deref().unwrap_or("-"),
        );
    }
    tracing::info!("Total: {} videos", videos.results.len());
    Ok(())
}

/// Runs the `tmdb trailer` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails or the browser cannot be opened.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_tmdb_trailer(client: &TmdbClient, args: &TrailerArgs) -> Result<()> {
    let videos = client
        .movie_videos(args.id)
        .await
        .context("TMDB movie videos request failed")?;

    let Some(video) = select_trailer(&videos.results) else {
        tracing::info!("No trailer found");
        return Ok(());
    };
    let url = trailer_url(video);
    tracing::info!("{}: {url}", video.name.as_deref().unwrap_or("Trailer"));
    if args.open {
        open::that(&url).with_context(|| format!("failed to open {url}"))?;
    }
    Ok(())
}

/// Runs the `tmdb image` subcommand.
///
/// # Errors
///
/// Returns an error if the path is blank.
fn run_tmdb_image(args: &ImageArgs) -> Result<()> {
    let Some(url) = image_url(Some(&args.path), args.size) else {
        bail!("image path must not be empty");
    };
    tracing::info!("{url}");
    Ok(())
}

/// Dispatches a `tmdb` subcommand.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the subcommand fails.
async fn run_tmdb(cmd: TmdbCommand, dir: Option<&PathBuf>) -> Result<()> {
    if let TmdbSubcommands::Image(args) = &cmd.command {
        return run_tmdb_image(args);
    }

    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb, cmd.language.as_deref())?;

    match cmd.command {
        TmdbSubcommands::Trending(args) => run_tmdb_trending(&client, &args).await,
        TmdbSubcommands::Popular(args) => {
            run_tmdb_list(&client, &MovieSource::Popular, &args).await
        }
        TmdbSubcommands::TopRated(args) => {
            run_tmdb_list(&client, &MovieSource::TopRated, &args).await
        }
        TmdbSubcommands::NowPlaying(args) => {
            run_tmdb_list(&client, &MovieSource::NowPlaying, &args).await
        }
        TmdbSubcommands::Upcoming(args) => {
            run_tmdb_list(&client, &MovieSource::Upcoming, &args).await
        }
        TmdbSubcommands::Search(args) => {
            let query = args.query.trim();
            if query.is_empty() {
                bail!("search query must not be empty");
            }
            let mut params = SearchMovieParams::new(query).include_adult(args.include_adult);
            if let Some(year) = args.year {
                params = params.year(year);
            }
            run_tmdb_list(&client, &MovieSource::Search(params), &args.list).await
        }
        TmdbSubcommands::Genres => run_tmdb_genres(&client).await,
        TmdbSubcommands::Discover(args) => {
            run_tmdb_list(&client, &MovieSource::Genre(args.genre), &args.list).await
        }
        TmdbSubcommands::Latest(args) => {
            let until = args
                .until
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            run_tmdb_list(&client, &MovieSource::ReleasedBefore(until), &args.list).await
        }
        TmdbSubcommands::Details(args) => run_tmdb_details(&client, &args).await,
        TmdbSubcommands::Credits(args) => {
            run_tmdb_credits(&client, &args, config.browser.cast_limit).await
        }
        TmdbSubcommands::Videos(args) => run_tmdb_videos(&client, &args).await,
        TmdbSubcommands::Trailer(args) => run_tmdb_trailer(&client, &args).await,
        TmdbSubcommands::Image(args) => run_tmdb_image(&args),
    }
}

// --- browse / config / completions ---

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if config or client setup fails, or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb, None)?;

    let options = BrowserOptions {
        today: chrono::Local::now().date_naive(),
        trending_window: config.browser.trending_window()?,
        cast_limit: config.browser.cast_limit,
    };

    run_browser(Arc::new(client), options)
        .await
        .context("movie browser TUI failed")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = load_config(dir)?;

    let content =
        toml::to_string_pretty(&config.masked()).context("failed to serialize config to TOML")?;
    tracing::info!("# {}", config_path.display());
    for line in content.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote {}", config_path.display());
    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    let mut command = Cli::command();
    let name = command.get_name().to_owned();
    clap_complete::generate(args.shell, &mut command, name, &mut io::stdout());
}

// --- Entry point ---

/// Installs the tracing subscriber.
///
/// The browser owns the terminal, so it logs to stderr and stays silent
/// unless `RUST_LOG` asks for output.
fn init_tracing(browsing: bool) {
    let default_filter = if browsing { "off" } else { "info" };
    let writer = if browsing {
        BoxMakeWriter::new(io::stderr)
    } else {
        BoxMakeWriter::new(io::stdout)
    };

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
            )
            .with_target(false)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Browse));

    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Tmdb(cmd) => run_tmdb(cmd, dir).await,
        Commands::Browse => run_browse(dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Init(args) => run_config_init(&args, dir),
        },
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
