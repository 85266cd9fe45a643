use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use datatree::v1::{DataTree, NavigationState};

use crate::input::{print_json, read_value};

#[derive(Args, Debug, Default)]
pub struct ExpandArgs {
    /// Input file (reads from stdin if not provided)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Start from "expand all"
    #[arg(long, conflicts_with_all = ["collapse", "search"])]
    pub all: bool,

    /// Start from "collapse all"
    #[arg(long, conflicts_with = "search")]
    pub collapse: bool,

    /// Reveal the ancestor chain of a dotted id ("" closes everything)
    #[arg(long)]
    pub search: Option<String>,

    /// Toggle a node; repeatable, applied in order after the other flags
    #[arg(long = "toggle", value_name = "ID")]
    pub toggles: Vec<String>,
}

fn navigate(data: &mut DataTree, args: &ExpandArgs) -> NavigationState {
    if args.all {
        data.expand_all();
    } else if args.collapse {
        data.collapse_all();
    } else if let Some(text) = &args.search {
        data.search(text);
    }

    for id in &args.toggles {
        data.toggle(id);
    }

    data.state().clone()
}

pub fn run(args: ExpandArgs, pretty: bool) -> Result<()> {
    let value = read_value(args.input.as_ref())?;
    let mut data = DataTree::from_value(&value);
    let state = navigate(&mut data, &args);
    print_json(&state, pretty)
}
