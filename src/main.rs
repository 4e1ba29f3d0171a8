use std::{env, process};

use anyhow::Result;

mod app;
mod config;
mod state;
mod ui;

fn main() -> Result<()> {
    let mut config = match env::args().nth(1) {
        Some(path) => match config::json::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("invalid configuration: {e}");
                process::exit(2);
            }
        },
        None => config::AppConfig::default(),
    };
    config.apply_env(|key| env::var(key).ok());

    app::bootstrap::init_logging(&config.log_file)?;
    log::info!("dataset source: {}", config.source());

    app::run::run(&config)
}
