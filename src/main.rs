use anyhow::{Context, Result};
use appstore_backend::auth::AdminCredentials;
use appstore_backend::build_router;
use appstore_backend::state::AppState;
use appstore_backend::store::Store;
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// App Store Backend Server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server listen address
    #[arg(long, env = "LISTEN_URL", default_value = "0.0.0.0")]
    listen_url: String,

    /// Server listen port
    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Path to the JSON catalog document
    #[arg(long, env = "DATA_FILE", default_value = "data.json")]
    data_file: PathBuf,

    /// Directory for uploaded files
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
    uploads_dir: PathBuf,

    /// Admin username for basic authentication
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Admin password for basic authentication
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin")]
    admin_password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appstore_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting App Store Backend");

    let args = Args::parse();

    tracing::info!("Configuration:");
    tracing::info!("  Listen URL: {}", args.listen_url);
    tracing::info!("  Port: {}", args.port);
    tracing::info!("  Data file: {}", args.data_file.display());
    tracing::info!("  Uploads directory: {}", args.uploads_dir.display());
    if args.admin_password == "admin" {
        tracing::warn!("Using the default admin password; set ADMIN_PASSWORD in production");
    }

    std::fs::create_dir_all(&args.uploads_dir).context("Failed to create uploads directory")?;

    // Initialize the data file up front so the first request finds it
    let store = Store::new(&args.data_file);
    let doc = store.load();
    tracing::info!(
        "Catalog loaded: {} apps, {} categories",
        doc.apps.len(),
        doc.categories.len()
    );

    let state = AppState {
        store: Arc::new(store),
        uploads_dir: args.uploads_dir,
        admin: Arc::new(AdminCredentials::new(
            args.admin_username,
            &args.admin_password,
        )),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", args.listen_url, args.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Server started successfully");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
