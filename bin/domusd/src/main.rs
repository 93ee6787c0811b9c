//! `domusd` — the domus server binary.
//!
//! Usage:
//!   domusd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/domus/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod directory;
mod routes;

use std::sync::Arc;

use clap::Parser;
use domus_core::Module;
use tracing::info;

use config::ServerConfig;

/// Domus server.
#[derive(Parser, Debug)]
#[command(name = "domusd", about = "Domus community backend")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config value).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let mut server_config = ServerConfig::load(&config_path)?;
    if let Some(listen) = cli.listen {
        server_config.listen = listen;
    }

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let sql: Arc<dyn domus_sql::SQLStore> = Arc::new(
        domus_sql::SqliteStore::open(&data_dir.join("domus.sqlite"))
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Bootstrap: ensure the admin account exists.
    let user_directory = Arc::new(directory::SqlUserDirectory::new(Arc::clone(&sql))?);
    bootstrap::ensure_admin_user(&user_directory, &server_config)?;

    // ── Auth module ──

    let auth_config = server_config.auth_config();
    let sessions = Arc::new(auth::store::SqlSessionStore::new(
        Arc::clone(&sql),
        auth_config.refresh_ttl_secs,
    )?);
    let auth_service = Arc::new(auth::service::AuthService::new(
        sessions,
        user_directory,
        auth_config,
    ));
    let auth_module = auth::AuthModule::new(auth_service);
    info!("{} module initialized", auth_module.name());

    // Build router.
    let app = routes::build_router(&auth_module);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&server_config.listen).await?;
    info!("Domus server listening on {}", server_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
