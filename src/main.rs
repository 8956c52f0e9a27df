//! chen-graph CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "chen-graph")]
#[command(about = "Structural hashing, diffing and similarity for code property graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

/// Rendering of graph-shaped results.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    /// Adjacency mapping as JSON
    Json,
    /// Graphviz DOT
    Dot,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Weisfeiler-Lehman hash of a graph
    Hash {
        file: PathBuf,

        /// Print per-node subgraph hashes instead
        #[arg(short, long)]
        subgraph: bool,
    },
    /// Show what changed between two graphs
    Diff {
        first: PathBuf,
        second: PathBuf,

        /// Keep unchanged nodes and edges in the output
        #[arg(long)]
        include_common: bool,

        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },
    /// Decide whether two graphs are similar
    Similar { first: PathBuf, second: PathBuf },
    /// Compute the graph edit distance
    Distance {
        first: PathBuf,
        second: PathBuf,

        /// Run the exact search without a timeout and print the node mapping
        #[arg(long)]
        exact: bool,
    },
    /// Print the SNAP summary of a graph
    Summarize {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },
    /// Convert a GraphML file to DOT or adjacency JSON
    Export {
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "dot")]
        format: Format,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("chen_graph={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Hash { file, subgraph } => commands::hash(&file, subgraph, &config),
        Commands::Diff {
            first,
            second,
            include_common,
            format,
        } => commands::diff(&first, &second, include_common, format),
        Commands::Similar { first, second } => commands::similar(&first, &second, &config),
        Commands::Distance {
            first,
            second,
            exact,
        } => commands::distance(&first, &second, exact, &config),
        Commands::Summarize { file, format } => commands::summarize(&file, format, &config),
        Commands::Export {
            file,
            output,
            format,
        } => commands::export(&file, &output, format),
        Commands::Version => {
            println!("chen-graph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
