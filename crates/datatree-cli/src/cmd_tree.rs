use anyhow::Result;
use std::path::PathBuf;

use datatree::v1::{BuildOptions, FormatOptions, Tree, TreeStats, build_with};

use crate::input::{print_json, read_value};

fn load_tree(input: Option<&PathBuf>, truncate_at: usize) -> Result<Tree> {
    let value = read_value(input)?;
    let options = BuildOptions {
        format: FormatOptions { truncate_at },
    };
    Ok(build_with(&value, &options))
}

pub fn run_tree(input: Option<PathBuf>, truncate_at: usize, pretty: bool) -> Result<()> {
    let tree = load_tree(input.as_ref(), truncate_at)?;
    print_json(&tree, pretty)
}

pub fn run_stats(input: Option<PathBuf>, pretty: bool) -> Result<()> {
    let tree = load_tree(input.as_ref(), FormatOptions::default().truncate_at)?;
    print_json(&TreeStats::of(&tree), pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::write_temp_json;
    use datatree::v1::TypeTag;

    #[test]
    fn test_load_tree_applies_truncation() {
        let f = write_temp_json(r#"{"s": "abcdefghij"}"#);
        let tree = load_tree(Some(&f.path().to_path_buf()), 5).unwrap();
        let node = &tree.roots()[0];
        assert_eq!(node.node_type, TypeTag::String);
        assert_eq!(
            node.value.format.as_ref().unwrap().truncated.as_deref(),
            Some("abcde...")
        );
    }

    #[test]
    fn test_run_tree() {
        let f = write_temp_json(r#"{"a": {"b": 1, "c": [1, 2]}}"#);
        assert!(run_tree(Some(f.path().to_path_buf()), 75, false).is_ok());
        assert!(run_tree(Some(f.path().to_path_buf()), 75, true).is_ok());
    }

    #[test]
    fn test_run_tree_empty_document() {
        let f = write_temp_json("{}");
        assert!(run_tree(Some(f.path().to_path_buf()), 75, false).is_ok());
    }

    #[test]
    fn test_run_stats() {
        let f = write_temp_json(r#"[1, [2, 3], {"x": null}]"#);
        assert!(run_stats(Some(f.path().to_path_buf()), false).is_ok());
    }

    #[test]
    fn test_run_tree_nonexistent_file() {
        assert!(run_tree(Some(PathBuf::from("/nonexistent/file.json")), 75, false).is_err());
    }
}
