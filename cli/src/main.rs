//! Subway service CLI server
//!
//! ```sh
//! # Run with default config (~/.config/subway-service/config.toml)
//! subway-service
//!
//! # Custom config path
//! subway-service --config /etc/subway-service/config.toml
//!
//! # Throwaway instance without a database
//! subway-service --memory --api-port 8081
//!
//! # Validate config without starting
//! subway-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use subway::config::{AppConfig, StorageKind};
use subway::server::{init_tracing, ServerHandle, ServerOptions};

/// Subway line and section management service.
#[derive(Parser, Debug)]
#[command(
    name = "subway-service",
    version,
    about = "REST API for subway lines, sections and stations",
    long_about = "Subway service: REST API for managing subway lines as chains of \
                  sections between stations.\n\n\
                  Default config: ~/.config/subway-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SUBWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Use in-memory storage regardless of the config file.
    #[arg(long)]
    memory: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(subway::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}:{}", config.server.api_host, config.server.api_port);
                println!("   Storage     : {:?}", config.database.storage);
                println!("   Database    : {}", config.database.connection_url());
                println!("   Log level   : {}", config.logging.level);
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
                std::process::exit(1);
            }
        };
    }

    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if cli.memory {
        info!("CLI override: storage = memory");
        config.database.storage = StorageKind::Memory;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    Ok(())
}
