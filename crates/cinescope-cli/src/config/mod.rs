//! Application configuration module.
//!
//! Manages the TOML config file holding the TMDB credential and browser
//! preferences.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, BrowserConfig, TmdbConfig, mask_secret};
pub use paths::resolve_config_path;
