//! Lookup operations over a built [`Tree`].
//!
//! All traversals are iterative depth-first searches with an explicit stack.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{Tree, TreeNode, TypeTag};

/// First node, in document order, whose id is `id`.
///
/// ```
/// use datatree::v1::{build, locate, Value};
///
/// let tree = build(&Value::object([("a", Value::array([10, 20]))]));
/// let node = locate::find_by_id("a.1", &tree).unwrap();
/// assert_eq!(node.value.format.as_ref().unwrap().raw, "20");
/// assert!(locate::find_by_id("a.2", &tree).is_none());
/// ```
pub fn find_by_id<'a>(id: &str, tree: &'a Tree) -> Option<&'a TreeNode> {
    let mut stack: Vec<&TreeNode> = tree.roots().iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.child_nodes().iter().rev());
    }

    None
}

/// Memo for [`find_path_with_cache`].
///
/// Entries are keyed by the target id and the visited node's position, so
/// one cache can serve repeated searches for the same target. It belongs to
/// a single tree: reuse against another tree, or after a rebuild, returns
/// stale answers.
#[derive(Debug, Clone, Default)]
pub struct PathCache {
    entries: HashMap<(String, String), Option<Vec<String>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn get(&self, target: &str, key: &str) -> Option<&Option<Vec<String>>> {
        self.entries.get(&(target.to_string(), key.to_string()))
    }

    fn insert(&mut self, target: &str, key: String, result: Option<Vec<String>>) {
        self.entries.insert((target.to_string(), key), result);
    }
}

fn position_key(node_id: &str, trail: &[&str]) -> String {
    format!("{}-{}", node_id, trail.join("."))
}

/// Ids from the top level down to the node `id`, inclusive.
///
/// The result's last element is `id` and its length is the node's depth
/// plus one.
///
/// ```
/// use datatree::v1::{build, locate, Value};
///
/// let value = Value::object([("a", Value::object([("c", Value::array([1, 2]))]))]);
/// let tree = build(&value);
/// assert_eq!(
///     locate::find_path("a.c.1", &tree).unwrap(),
///     vec!["a", "a.c", "a.c.1"]
/// );
/// ```
pub fn find_path(id: &str, tree: &Tree) -> Option<Vec<String>> {
    find_path_with_cache(id, tree, &mut PathCache::new())
}

/// [`find_path`] with a caller-owned memo.
///
/// A subtree already searched for `id` without success is skipped; a
/// position already known to lead to `id` answers immediately.
pub fn find_path_with_cache(id: &str, tree: &Tree, cache: &mut PathCache) -> Option<Vec<String>> {
    let mut stack: Vec<(&TreeNode, usize)> = tree.roots().iter().map(|n| (n, 0)).collect();
    // Ids of the current node's ancestors; valid up to the popped depth.
    let mut trail: Vec<&str> = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        trail.truncate(depth);
        let key = position_key(&node.id, &trail);

        match cache.get(id, &key) {
            Some(Some(hit)) => return Some(hit.clone()),
            Some(None) => continue,
            None => {}
        }

        if node.id == id {
            let mut result: Vec<String> = trail.iter().map(|s| s.to_string()).collect();
            result.push(node.id.clone());

            for (i, ancestor) in trail.iter().enumerate() {
                cache.insert(id, position_key(ancestor, &trail[..i]), Some(result.clone()));
            }
            cache.insert(id, key, Some(result.clone()));
            return Some(result);
        }

        trail.push(&node.id);
        stack.extend(node.child_nodes().iter().map(|c| (c, depth + 1)));
        cache.insert(id, key, None);
    }

    None
}

/// An entry for a selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdOption {
    pub label: String,
    pub value: String,
}

/// Every node id, in document (pre-)order.
pub fn collect_ids(tree: &Tree) -> Vec<IdOption> {
    let mut result = Vec::new();
    let mut stack: Vec<&TreeNode> = tree.roots().iter().rev().collect();

    while let Some(node) = stack.pop() {
        result.push(IdOption {
            label: node.id.clone(),
            value: node.id.clone(),
        });
        stack.extend(node.child_nodes().iter().rev());
    }

    result
}

/// Ids revealed by "expand all".
///
/// For each top-level node that has children: the ids of those children
/// that are Objects, followed by the node's own id. Array-typed children
/// are not included. Only a `Forest` produces ids.
pub fn descendants_of_first_two_levels(tree: &Tree) -> Vec<String> {
    let Tree::Forest(roots) = tree else {
        return Vec::new();
    };

    let mut ids = Vec::new();
    for node in roots {
        let Some(children) = &node.children else {
            continue;
        };
        ids.extend(
            children
                .iter()
                .filter(|c| c.node_type == TypeTag::Object)
                .map(|c| c.id.clone()),
        );
        ids.push(node.id.clone());
    }
    ids
}
