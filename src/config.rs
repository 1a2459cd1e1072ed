use std::{env, path::PathBuf};

use dotenvy::dotenv;
use log::LevelFilter;

const DEFAULT_DATABASE_URL: &str = "mozijegy.db";
const DEFAULT_TICKETS_DIR: &str = "tickets";
const DEFAULT_LOG_FILE: &str = "cinema_tickets.log";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub tickets_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_env() -> eyre::Result<Settings> {
        dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Settings> {
        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| eyre::eyre!("LOG_LEVEL {:?} is not a log level", level))?,
            None => LevelFilter::Debug,
        };

        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            tickets_dir: lookup("TICKETS_DIR")
                .unwrap_or_else(|| DEFAULT_TICKETS_DIR.into())
                .into(),
            log_file: lookup("LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.into())
                .into(),
            log_level,
        })
    }
}
