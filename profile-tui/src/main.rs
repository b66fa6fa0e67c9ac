use std::{fs::OpenOptions, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};
use profile_tui::{Settings, config::AppConfig, run_tui};

#[derive(Parser, Debug)]
#[clap(name = "group-profile")]
#[clap(about = "Edit the group profile and browse favorite recipes", long_about = None)]
struct Cli {
    /// Config file to read instead of the default one
    #[clap(long, short)]
    config: Option<PathBuf>,

    /// JSON file holding the saved profile
    #[clap(long, short)]
    store: Option<PathBuf>,

    /// JSON file with the favorite recipes
    #[clap(long, short)]
    favorites: Option<PathBuf>,

    /// File the log is written to
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[clap(long, action)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::config_file()?,
    };
    let config = AppConfig::load_from(&config_path)?.merge(AppConfig {
        store_file: cli.store,
        favorites_file: cli.favorites,
        log_file: cli.log_file,
    });

    if cli.save_config {
        config.save_to(&config_path)?;
    }

    init_logger(&config)?;
    log::info!("Using config {}", config_path.display());

    run_tui(Settings {
        store_file: config.store_file_or_default()?,
        favorites_file: config.favorites_file.clone(),
    })
    .await
}

// The terminal belongs to the UI, so logs go to a file.
fn init_logger(config: &AppConfig) -> Result<()> {
    let path = config.log_file_or_default()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| {
            format!("Failed to create log directory: {}", dir.display())
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
