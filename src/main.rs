//! To-do list API entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use todo_api::api::{cors_layer, create_router, AppState};
use todo_api::config::{Config, ProxyConfig};
use todo_api::metrics;
use todo_api::proxy::{create_proxy_router, ProxyState};
use todo_api::store::{ItemStore, PgItemStore};
use todo_api::utils::shutdown_signal;

/// To-do list CRUD API.
#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(about = "CRUD API for to-do items backed by PostgreSQL")]
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
    /// Run the API server (default).
    Run {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Connect to the database, run the schema migration, and exit.
    Migrate,

    /// Run the upstream status proxy.
    Proxy {
        /// HTTP server port (overrides PROXY_PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("todo_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Migrate) => cmd_migrate().await,
        Some(Command::Run { port }) => cmd_run(port).await,
        Some(Command::Proxy { port }) => cmd_proxy(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TODO API - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database URL: present");
    println!("  Pool Size: {} connections", config.db_max_connections);
    println!(
        "  Retry Budget: {} attempts, {}s max delay",
        config.db_max_retries, config.db_max_retry_delay_s
    );
    println!("  API Port: {}", config.port);
    println!(
        "  CORS: {}",
        match config.cors_origins() {
            Some(origins) => format!("allow-list ({} origins)", origins.len()),
            None => "any origin".to_string(),
        }
    );
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            format!("enabled on port {}", config.metrics_port)
        } else {
            "disabled".to_string()
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Connect and run the schema migration.
async fn cmd_migrate() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Connecting to database...");
    let store = PgItemStore::connect(&config).await?;

    info!("Running schema migration...");
    store.migrate().await?;

    info!("Migration complete");
    Ok(())
}

/// Run the API server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration; a missing DATABASE_URL fails here, before any
    // listener binds.
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");

    // Initialize metrics
    if config.metrics_enabled {
        metrics::install_exporter(config.metrics_port)?;
        info!("Prometheus exporter listening on port {}", config.metrics_port);
    }
    metrics::init_metrics();

    // Connect and migrate before serving; an unreachable database after the
    // retry budget terminates startup with a non-zero exit.
    let store = PgItemStore::connect(&config).await?;
    store.migrate().await?;

    let state = AppState::new(Arc::new(store) as Arc<dyn ItemStore>);
    let cors = cors_layer(&config)?;
    let router = create_router(state, cors);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Run the upstream status proxy.
async fn cmd_proxy(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading proxy configuration...");
    let mut config = ProxyConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.proxy_port = port;
    }

    let state = ProxyState::new(&config)?;
    let router = create_proxy_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.proxy_port));
    let listener = TcpListener::bind(addr).await?;
    info!("Status proxy listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy stopped");
    Ok(())
}
