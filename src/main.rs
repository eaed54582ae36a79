use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use voluntrac::backends::factory::{
    build_offline_services, build_services, DEMO_ADMIN_EMAIL, DEMO_PASSWORD, DEMO_VOLUNTEER_EMAIL,
};
use voluntrac::config::Config;
use voluntrac::logger::Logger;
use voluntrac::ui::{self, core::AppContext};

#[derive(Parser, Debug)]
#[command(name = "voluntrac", version, about = "Terminal client for VoluntTrac volunteer task management")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run against in-memory services seeded with demo data
    #[arg(long)]
    offline: bool,

    /// Write a default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        let path = match args.config {
            Some(path) => path,
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(path);
    }

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    let logger = Logger::from_config(config.logging.enabled)?;
    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logger.install(level)?;

    let services = if args.offline {
        log::info!(
            "Offline mode: sign in as {} or {} with password '{}'",
            DEMO_VOLUNTEER_EMAIL,
            DEMO_ADMIN_EMAIL,
            DEMO_PASSWORD
        );
        build_offline_services(&config).services()
    } else {
        match build_services(&config) {
            Ok(services) => services,
            Err(e) => {
                eprintln!("❌ Error: {:#}", e);
                eprintln!("\n💡 To use this app:");
                eprintln!("1. Set {} to your Firebase web API key", config.firebase.api_key_env);
                eprintln!("2. Optionally set {} for place search", config.maps.api_key_env);
                eprintln!("3. Or run `voluntrac --offline` to try it with demo data");
                return Ok(());
            }
        }
    };

    ui::run_app(AppContext::new(services, config, logger)).await
}
