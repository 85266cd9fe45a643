mod cmd_expand;
mod cmd_query;
mod cmd_tree;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "datatree")]
#[command(about = "Build, query, and navigate inspection trees for JSON documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tree built from a document
    Tree {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Characters shown before values are truncated
        #[arg(long, default_value_t = datatree::v1::format::DEFAULT_TRUNCATE_AT)]
        truncate_at: usize,
    },
    /// Print node, leaf, and cycle counts for a document
    Stats {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Look up nodes in a document's tree
    Query {
        #[command(subcommand)]
        op: cmd_query::QueryOp,
    },
    /// Print the navigation state after expand/collapse/search/toggle
    Expand(cmd_expand::ExpandArgs),
    /// Print the type tag of a JSON literal
    Classify {
        /// JSON literal, e.g. '"123"' or '7.5'
        value: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tree { input, truncate_at } => cmd_tree::run_tree(input, truncate_at, cli.pretty),
        Commands::Stats { input } => cmd_tree::run_stats(input, cli.pretty),
        Commands::Query { op } => cmd_query::run(op, cli.pretty),
        Commands::Expand(args) => cmd_expand::run(args, cli.pretty),
        Commands::Classify { value } => cmd_query::run_classify(&value),
    }
}
