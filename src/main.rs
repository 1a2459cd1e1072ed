mod config;
mod error;
mod interface;
mod inventory;
mod models;
mod receipt;
mod schema;
mod store;

use log::*;
use simplelog::*;
use std::fs::File;

use crate::config::Settings;
use crate::store::Database;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let settings = Settings::from_env()?;

    // init logging; the terminal belongs to the ui, so log to a file
    WriteLogger::init(
        settings.log_level,
        Config::default(),
        File::create(&settings.log_file)?,
    )?;
    info!("Starting with {:?}", settings);

    let db = Database::open(&settings.database_url)?;
    interface::run(db, settings.tickets_dir)
}
