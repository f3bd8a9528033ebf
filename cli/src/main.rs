//! Maison booking, CLI server
//!
//! ```sh
//! # Run with default config (~/.config/maison-booking/config.toml)
//! booking-service
//!
//! # Custom config path and port
//! booking-service --config /etc/maison-booking/config.toml --api-port 8080
//!
//! # Throwaway run without a database
//! booking-service --memory
//!
//! # Validate config without starting
//! booking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use maison_booking::config::AppConfig;
use maison_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Shared-calendar booking server.
#[derive(Parser, Debug)]
#[command(
    name = "booking-service",
    version,
    about = "REST server for the shared Maison booking calendar",
    long_about = "Maison booking: reservations over inclusive date ranges, \
                  overlapping bookings rejected.\n\n\
                  Default config: ~/.config/maison-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Keep reservations in memory only.
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(maison_booking::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    match load_error {
        None => {
            init_tracing(&config);
            info!("Configuration loaded from {}", config_path.display());
        }
        Some(e) if cli.check => {
            eprintln!("Invalid configuration {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        Some(e) => {
            // Plain fallback subscriber: the logging section could not be read
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        in_memory: cli.memory,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start booking service: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
