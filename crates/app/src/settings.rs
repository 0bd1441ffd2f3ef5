//! Handles settings for the application.
//!
//! Values are layered, last one wins: built-in defaults, the settings file
//! (`config/bookkeeper.toml` unless `--config` says otherwise, optional),
//! `BOOKKEEPER__<SECTION>__<KEY>` environment variables, command line flags.
//!
//! See `config/bookkeeper.toml` for the configuration.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Value of `server.database` selecting a throwaway in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

#[derive(Parser, Debug)]
#[command(name = "bookkeeper")]
#[command(about = "Personal finance record keeper: expenditures, incomes and their labels")]
pub struct Cli {
    /// Settings file; the extension may be omitted.
    #[arg(long, default_value = "config/bookkeeper")]
    pub config: String,
    /// Log level of the application crates.
    #[arg(long)]
    pub level: Option<String>,
    /// Address the HTTP server binds to.
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    /// SQLite file, or `:memory:`.
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    database: String,
}

impl Server {
    pub fn database(&self) -> Database {
        if self.database == MEMORY_DATABASE {
            Database::Memory
        } else {
            Database::Sqlite(self.database.clone())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "bookkeeper.db")?
            .add_source(File::with_name(&cli.config).required(false))
            .add_source(Environment::with_prefix("BOOKKEEPER").separator("__"))
            .set_override_option("app.level", cli.level.clone())?
            .set_override_option("server.bind", cli.bind.clone())?
            .set_override_option("server.port", cli.port.map(u64::from))?
            .set_override_option("server.database", cli.database.clone())?
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["bookkeeper", "--config", "does/not/exist"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn defaults_apply_without_settings_file() {
        let settings = Settings::new(&cli(&[])).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.server.database(),
            Database::Sqlite("bookkeeper.db".to_string())
        );
    }

    #[test]
    fn flags_override_defaults() {
        let settings = Settings::new(&cli(&[
            "--port",
            "8080",
            "--database",
            MEMORY_DATABASE,
            "--level",
            "debug",
        ]))
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database(), Database::Memory);
        assert_eq!(settings.app.level, "debug");
    }

    #[test]
    fn database_urls() {
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::Sqlite("data/books.db".to_string()).url(),
            "sqlite:data/books.db?mode=rwc"
        );
    }
}
