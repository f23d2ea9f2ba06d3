//! taskdeck - headless console client for a todo-list REST backend
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use taskdeck_api::ReqwestTransport;
use taskdeck_app::config::{
    apply_env_overrides, init_config_dir, load_settings, load_settings_from, Settings,
};
use taskdeck_app::App;
use taskdeck_core::logging;

/// taskdeck - drive a todo-list backend from the command line
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(about = "Headless console client for a todo-list REST backend", long_about = None)]
struct Args {
    /// Read settings from this file instead of .taskdeck/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and TASKDECK_BASE_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// API key sent with every request (overrides config and TASKDECK_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Write a default .taskdeck/config.toml in the current directory and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let args = Args::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init {
        init_config_dir(&cwd)?;
        eprintln!("Wrote default config under {}", cwd.join(".taskdeck").display());
        return Ok(());
    }

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(&cwd),
    };
    apply_env_overrides(&mut settings);
    apply_cli_overrides(&mut settings, &args);
    settings.validate()?;

    info!("Using backend at {}", settings.api.base_url);
    let transport = ReqwestTransport::new(&settings.api.base_url, &settings.api.transport_options())?;
    let app = App::new(transport);

    taskdeck::run_headless(&app, &settings.console).await?;
    Ok(())
}

/// Command-line flags win over the environment and the config file.
fn apply_cli_overrides(settings: &mut Settings, args: &Args) {
    if let Some(base_url) = &args.base_url {
        settings.api.base_url = base_url.clone();
    }
    if let Some(api_key) = &args.api_key {
        settings.api.api_key = Some(api_key.clone());
    }
}
