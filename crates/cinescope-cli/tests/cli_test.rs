#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};
use tempfile::TempDir;

/// Command with no credentials or log filter inherited from the environment.
fn cinescope(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.arg("--dir")
        .arg(dir.path())
        .env_remove("TMDB_API_KEY")
        .env_remove("TMDB_API_TOKEN")
        .env_remove("RUST_LOG")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("tmdb"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_tmdb_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["tmdb", "search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_tmdb_list_page_conflicts_with_pages() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["tmdb", "popular", "--page", "2", "--pages", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_tmdb_list_page_out_of_range() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["tmdb", "top-rated", "--page", "501"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--page"));
}

#[test]
fn test_tmdb_trending_invalid_window() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["tmdb", "trending", "--window", "month"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time window"));
}

#[test]
fn test_tmdb_image_needs_no_credential() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    cinescope(&dir)
        .args(["tmdb", "image", "--path", "/abc.jpg", "--size", "w780"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://image.tmdb.org/t/p/w780/abc.jpg",
        ));
}

#[test]
fn test_tmdb_image_blank_path() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    cinescope(&dir)
        .args(["tmdb", "image", "--path", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("image path must not be empty"));
}

#[test]
fn test_tmdb_without_credential_fails() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    cinescope(&dir)
        .args(["tmdb", "popular"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB credential is required"));
}

#[test]
fn test_browse_without_credential_fails() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    cinescope(&dir)
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB credential is required"));
}

#[test]
fn test_config_init_then_refuses_overwrite() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    cinescope(&dir).args(["config", "init"]).assert().success();

    // Assert
    assert!(dir.path().join("config.toml").exists());
    cinescope(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    cinescope(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_masks_secrets() {
    // Arrange
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_key = \"abcd1234efgh\"\n",
    )
    .unwrap();

    // Act & Assert
    cinescope(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd****"))
        .stdout(predicate::str::contains("abcd1234efgh").not());
}

#[test]
fn test_config_show_env_overrides_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_key = \"file-key-123\"\n",
    )
    .unwrap();

    // Act & Assert
    cinescope(&dir)
        .env("TMDB_API_TOKEN", "envtoken-456")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("envt****"))
        .stdout(predicate::str::contains("file****").not());
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cinescope"));
}
