//! Cafeteria Catalog Server
//!
//! Serves categories, products and desserts over HTTP, backed by SQLite.
//!
//! # Configuration
//!
//! Environment variables:
//! - `CAFETERIA_CONFIG`: Path to config file (default: ~/.config/cafeteria/config.yaml)
//! - `CAFETERIA_DATABASE_PATH`: SQLite database file (default: ~/.local/share/cafeteria/cafeteria_db.sqlite)
//! - `CAFETERIA_PORT`: Port to listen on (default: 8080)
//! - `CAFETERIA_STATIC_DIR`: Directory holding buscador.html (default: .)
//! - `CAFETERIA_SEED`: Seed empty collections at startup (default: true)
//!
//! # Config File Format
//!
//! ```yaml
//! database_path: /var/lib/cafeteria/cafeteria_db.sqlite
//! port: 8080
//! static_dir: /srv/cafeteria
//! seed_sample_data: true
//! ```

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cafeteria::db::init_db;
use cafeteria::server::{router, AppState};
use cafeteria::{Catalog, Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cafeteria=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load(None)?;

    tracing::info!("Database: {}", config.database_path.display());
    tracing::info!("Static directory: {}", config.static_dir.display());

    // A store we cannot open is fatal
    let pool = init_db(config.database_path()).await?;
    let catalog = Catalog::new(pool);

    if config.seed_sample_data {
        let report = catalog.seed().await?;
        tracing::info!(
            categorias = report.categorias,
            productos = report.productos,
            postres = report.postres,
            "Sample data check complete"
        );
    }

    let state = AppState {
        catalog,
        search_page: config.search_page(),
        port: config.port,
    };
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
