//! Wayfare CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "wayfare")]
#[command(about = "Travel-cost graph with durable edges and cheapest-route search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the durable graph files
    #[arg(short, long, default_value = ".wayfare")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new point
    AddPoint {
        /// Display name for the point
        name: String,
    },
    /// Rename an existing point
    RenamePoint { id: u64, name: String },
    /// List registered points
    Points,
    /// Remove a point together with every edge touching it
    RemovePoint { id: u64 },
    /// Create or update the edge between two points
    SetEdge { a: u64, b: u64, cost: f64 },
    /// Reset an edge's cost to zero
    ClearEdge { a: u64, b: u64 },
    /// List the edges leaving a point
    Edges { id: u64 },
    /// Find the cheapest route between two points
    Path { from: u64, to: u64 },
    /// Total cost of travelling a route
    Cost {
        /// Point ids in travel order
        route: Vec<u64>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "wayfare={0},wayfare_core={0},wayfare_store={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::AddPoint { name } => commands::add_point(cli.data_dir, name).await,
        Commands::RenamePoint { id, name } => commands::rename_point(cli.data_dir, id, name).await,
        Commands::Points => commands::points(cli.data_dir).await,
        Commands::RemovePoint { id } => commands::remove_point(cli.data_dir, id).await,
        Commands::SetEdge { a, b, cost } => commands::set_edge(cli.data_dir, a, b, cost).await,
        Commands::ClearEdge { a, b } => commands::clear_edge(cli.data_dir, a, b).await,
        Commands::Edges { id } => commands::edges(cli.data_dir, id).await,
        Commands::Path { from, to } => commands::path(cli.data_dir, from, to).await,
        Commands::Cost { route } => commands::cost(cli.data_dir, route).await,
        Commands::Version => {
            println!("Wayfare v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
