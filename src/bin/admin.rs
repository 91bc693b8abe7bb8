//! Cafeteria Admin CLI
//!
//! Inspects and bootstraps the catalog database directly, without going
//! through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cafeteria-admin counters
//! cafeteria-admin stats --format json
//! cafeteria-admin seed
//! ```
//!
//! The database location is resolved the same way as the server's
//! (`--config`, `CAFETERIA_CONFIG`, `CAFETERIA_DATABASE_PATH`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cafeteria::catalog::{SeedReport, Statistics};
use cafeteria::db::init_db;
use cafeteria::models::CounterReport;
use cafeteria::{Catalog, Config};

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "cafeteria-admin")]
#[command(version)]
#[command(about = "Cafeteria catalog administration tool")]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show sequence counters
    Counters {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show per-category statistics
    Stats {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Populate empty collections with the reference menu
    Seed {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

// ============================================================================
// Commands
// ============================================================================

async fn show_counters(
    catalog: &Catalog,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let reports: Vec<CounterReport> = catalog
        .counters
        .list_counters()
        .await?
        .iter()
        .map(CounterReport::from)
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            if reports.is_empty() {
                println!("No counters yet.");
                return Ok(());
            }
            println!("{:<20} {:>12} {:>12}", "COLLECTION", "LAST ID", "NEXT ID");
            println!("{}", "-".repeat(46));
            for report in &reports {
                println!(
                    "{:<20} {:>12} {:>12}",
                    report.coleccion, report.ultimo_id_usado, report.proximo_id
                );
            }
        }
    }
    Ok(())
}

fn print_stats(stats: &Statistics) {
    println!("Products:   {}", stats.resumen.total_productos);
    println!("Desserts:   {}", stats.resumen.total_postres);
    println!("Categories: {}", stats.resumen.total_categorias);

    if !stats.estadisticas_productos.is_empty() {
        println!();
        println!(
            "{:<20} {:>6} {:>10} {:>10} {:>10}",
            "PRODUCT CATEGORY", "COUNT", "AVG", "MIN", "MAX"
        );
        println!("{}", "-".repeat(60));
        for group in &stats.estadisticas_productos {
            println!(
                "{:<20} {:>6} {:>10.2} {:>10.2} {:>10.2}",
                group.categoria,
                group.total_productos,
                group.precio_promedio,
                group.precio_minimo,
                group.precio_maximo
            );
        }
    }

    if !stats.estadisticas_postres.is_empty() {
        println!();
        println!(
            "{:<20} {:>6} {:>12} {:>12}",
            "DESSERT CATEGORY", "COUNT", "AVG SLICE", "AVG TOTAL"
        );
        println!("{}", "-".repeat(53));
        for group in &stats.estadisticas_postres {
            println!(
                "{:<20} {:>6} {:>12.2} {:>12.2}",
                group.categoria,
                group.total_postres,
                group.precio_promedio_rebanada,
                group.precio_promedio_total
            );
        }
    }
}

async fn show_stats(
    catalog: &Catalog,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = catalog.statistics().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => print_stats(&stats),
    }
    Ok(())
}

fn print_seed_report(report: &SeedReport) {
    if report.is_empty() {
        println!("Catalog already seeded, nothing to do.");
        return;
    }
    println!("Seeded categories: {}", report.categorias);
    println!("Seeded products:   {}", report.productos);
    println!("Seeded desserts:   {}", report.postres);
}

async fn seed(catalog: &Catalog, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let report = catalog.seed().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_seed_report(&report),
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    let pool = init_db(config.database_path()).await?;
    let catalog = Catalog::new(pool);

    match cli.command {
        Commands::Counters { format } => show_counters(&catalog, format).await,
        Commands::Stats { format } => show_stats(&catalog, format).await,
        Commands::Seed { format } => seed(&catalog, format).await,
    }
}
