//! In-memory people service entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use people_api::api::{create_router, AppState};
use people_api::config::Config;
use people_api::metrics;
use people_api::utils::shutdown_signal;

/// In-memory people CRUD service.
#[derive(Parser, Debug)]
#[command(name = "people-api")]
#[command(about = "HTTP service exposing CRUD over in-memory person records")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let port_override = match &args.command {
        Some(Command::Serve { port }) => port.or(args.port),
        _ => args.port,
    };
    let loaded = Config::load_validated(port_override);

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("people_api=debug,tower_http=debug,info")
    } else {
        match &loaded {
            Ok(config) => {
                EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
            }
            Err(_) => EnvFilter::new("info"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(loaded),
        _ => cmd_serve(loaded?).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(loaded: people_api::Result<Config>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PEOPLE API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match loaded {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration check failed"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  Log Filter: {}", config.rust_log);
    println!("  Seed People: {}", config.seed_people);
    println!("  Health Probes: {}", if config.health_enabled { "ENABLED" } else { "disabled" });
    if config.health_enabled {
        println!("    Max Tasks: {}", config.health_max_tasks);
        println!("    Upstream Host: {}", config.health_upstream_host);
        println!("    DNS Timeout: {}ms", config.health_dns_timeout_ms);
    }
    println!("  Metrics: {}", if config.metrics_enabled { "ENABLED" } else { "disabled" });
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    let metrics_handle = if config.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to install metrics recorder: {}", e);
                None
            }
        }
    } else {
        None
    };

    let state = AppState::from_config(&config, metrics_handle);
    metrics::set_people_stored(state.people.len().await);

    info!(
        seeded = config.seed_people,
        health = config.health_enabled,
        metrics = state.metrics.is_some(),
        "Starting people service"
    );

    // Start HTTP server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
