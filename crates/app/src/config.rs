use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

pub const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("could not read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not prepare database file: {0}")]
    Io(#[from] std::io::Error),
}

/// Twelve-question personality quiz in the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// `SQLite` URL or file path holding progress and statistics.
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite:quiz.sqlite3", global = true)]
    pub db_url: String,

    /// JSON question catalog to use instead of the built-in one.
    #[arg(long, env = "QUIZ_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Pause after each answer, in milliseconds.
    #[arg(long, env = "QUIZ_SELECT_DELAY_MS", default_value_t = 300, global = true)]
    pub select_delay_ms: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Take the quiz, resuming saved progress (default).
    Take,
    /// Show the last finished result.
    Result,
    /// Show how results are distributed.
    Stats,
    /// Forget saved progress.
    Reset,
    /// Replace the statistics with a fresh starting distribution.
    Seed {
        /// Fixed RNG seed for a reproducible distribution.
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Args {
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Take)
    }

    #[must_use]
    pub fn select_delay(&self) -> Duration {
        Duration::from_millis(self.select_delay_ms)
    }

    /// Catalog override text, if one was configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CatalogRead` if the file cannot be read.
    pub fn catalog_json(&self) -> Result<Option<String>, ConfigError> {
        let Some(path) = &self.catalog else {
            return Ok(None);
        };
        std::fs::read_to_string(path)
            .map(Some)
            .map_err(|source| ConfigError::CatalogRead {
                path: path.clone(),
                source,
            })
    }
}

/// Turn a bare path or relative `sqlite:` URL into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns `ConfigError` for a URL without a path or if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let invalid = || ConfigError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_take() {
        let args = Args::try_parse_from(["app"]).unwrap();
        assert_eq!(args.command(), Command::Take);
        assert_eq!(args.select_delay(), Duration::from_millis(300));
    }

    #[test]
    fn parses_seed_with_value() {
        let args = Args::try_parse_from(["app", "seed", "--seed", "9", "--db", MEMORY_URL]).unwrap();
        assert_eq!(args.command(), Command::Seed { seed: Some(9) });
        assert_eq!(args.db_url, MEMORY_URL);
    }

    #[test]
    fn memory_and_absolute_urls_pass_through() {
        assert_eq!(normalize_sqlite_url(MEMORY_URL), MEMORY_URL);
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/q.db"), "sqlite:///tmp/q.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/q.db"), "sqlite:///tmp/q.db");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("data/quiz.sqlite3");
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/quiz.sqlite3"), "{url}");
    }

    #[test]
    fn rejects_url_without_path() {
        assert!(matches!(
            prepare_sqlite_file("postgres://db"),
            Err(ConfigError::InvalidDbUrl { .. })
        ));
        assert!(matches!(
            prepare_sqlite_file("sqlite://"),
            Err(ConfigError::InvalidDbUrl { .. })
        ));
    }
}
