use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use datatree::v1::{Tree, TypeTag, Value, build, classify, locate};

use crate::input::{print_json, read_value};

#[derive(Subcommand, Debug)]
pub enum QueryOp {
    /// List every node id in document order
    Ids {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the node with the given id
    Find {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Dotted node id, e.g. "a.c.1"
        #[arg(long)]
        id: String,
    },
    /// Print the ids from the top level down to a node
    Path {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Dotted node id, e.g. "a.c.1"
        #[arg(long)]
        id: String,
    },
}

pub fn run(op: QueryOp, pretty: bool) -> Result<()> {
    match op {
        QueryOp::Ids { input } => run_ids(input, pretty),
        QueryOp::Find { input, id } => run_find(input, &id, pretty),
        QueryOp::Path { input, id } => run_path(input, &id, pretty),
    }
}

fn read_tree(input: Option<&PathBuf>) -> Result<Tree> {
    Ok(build(&read_value(input)?))
}

fn run_ids(input: Option<PathBuf>, pretty: bool) -> Result<()> {
    let tree = read_tree(input.as_ref())?;
    print_json(&locate::collect_ids(&tree), pretty)
}

fn run_find(input: Option<PathBuf>, id: &str, pretty: bool) -> Result<()> {
    let tree = read_tree(input.as_ref())?;
    let node = locate::find_by_id(id, &tree)
        .ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))?;
    print_json(node, pretty)
}

fn run_path(input: Option<PathBuf>, id: &str, pretty: bool) -> Result<()> {
    let tree = read_tree(input.as_ref())?;
    let path =
        locate::find_path(id, &tree).ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))?;
    print_json(&path, pretty)
}

fn classify_literal(literal: &str) -> Result<TypeTag> {
    let value = Value::from_json_str(literal)
        .with_context(|| format!("Not a JSON literal: {}", literal))?;
    Ok(classify(&value))
}

pub fn run_classify(literal: &str) -> Result<()> {
    println!("{}", classify_literal(literal)?);
    Ok(())
}
