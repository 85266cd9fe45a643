//! Expand/collapse state for browsing a [`Tree`].
//!
//! [`NavigationState`] is a value: every operation borrows the current state
//! and returns the next one. The tree itself is never touched. A state is
//! only meaningful for the tree it was derived from; after a rebuild, start
//! again from [`NavigationState::initialize`].

use serde::{Serialize, Serializer};
use std::collections::HashSet;

use crate::locate::{descendants_of_first_two_levels, find_by_id};
use crate::types::Tree;

/// Whether the expanded set came from "expand all", "collapse all", or
/// anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandFlag {
    Expanded,
    Collapsed,
    #[default]
    Undetermined,
}

/// Insertion-ordered set of expanded node ids.
#[derive(Debug, Clone, Default)]
pub struct ExpandedIds {
    order: Vec<String>,
    members: HashSet<String>,
}

impl ExpandedIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Returns `false` if `id` was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Returns `false` if `id` was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|x| x != id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }
}

impl PartialEq for ExpandedIds {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for ExpandedIds {}

impl<S: Into<String>> FromIterator<S> for ExpandedIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ids = Self::new();
        for id in iter {
            ids.insert(id);
        }
        ids
    }
}

impl Serialize for ExpandedIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.order)
    }
}

/// Which nodes are open, and how that came about.
///
/// # Example — reveal a node by its dotted id
///
/// ```
/// use datatree::v1::{build, ExpandFlag, NavigationState, Value};
///
/// let value = Value::object([("a", Value::object([("c", Value::array([1, 2]))]))]);
/// let tree = build(&value);
///
/// let state = NavigationState::initialize(&tree).search_and_expand("a.c.1");
/// assert_eq!(state.expanded.as_slice(), ["a", "a.c", "a.c.1"]);
/// assert_eq!(state.all_expanded, ExpandFlag::Undetermined);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub expanded: ExpandedIds,
    pub all_expanded: ExpandFlag,
}

impl NavigationState {
    pub fn new(expanded: ExpandedIds, all_expanded: ExpandFlag) -> Self {
        Self {
            expanded,
            all_expanded,
        }
    }

    /// Only the first top-level node is open.
    pub fn initialize(tree: &Tree) -> Self {
        Self::new(first_node(tree), ExpandFlag::Undetermined)
    }

    /// Open the top-level nodes and their Object children.
    pub fn expand_all(&self, tree: &Tree) -> Self {
        let ids = descendants_of_first_two_levels(tree);
        tracing::trace!(count = ids.len(), "expand all");
        Self::new(ids.into_iter().collect(), ExpandFlag::Expanded)
    }

    /// Back to just the first top-level node.
    pub fn collapse_all(&self, tree: &Tree) -> Self {
        tracing::trace!("collapse all");
        Self::new(first_node(tree), ExpandFlag::Collapsed)
    }

    /// Open or close `node_id`.
    ///
    /// Closing removes the node and its direct children from the set; ids of
    /// deeper descendants stay in it. Opening adds the node and its direct
    /// children, and does nothing if `node_id` is not in `tree`.
    pub fn toggle(&self, tree: &Tree, node_id: &str) -> Self {
        let mut expanded = self.expanded.clone();

        if expanded.contains(node_id) {
            expanded.remove(node_id);
            if let Some(node) = find_by_id(node_id, tree) {
                for child in node.child_nodes() {
                    expanded.remove(&child.id);
                }
            }
            tracing::trace!(node_id, "collapsed node");
        } else if let Some(node) = find_by_id(node_id, tree) {
            expanded.insert(node_id);
            for child in node.child_nodes() {
                expanded.insert(child.id.as_str());
            }
            tracing::trace!(node_id, "expanded node");
        }

        Self::new(expanded, ExpandFlag::Undetermined)
    }

    /// Open exactly the ancestor chain named by a dotted id.
    ///
    /// An empty `text` closes everything.
    pub fn search_and_expand(&self, text: &str) -> Self {
        Self::new(path_prefixes(text).into_iter().collect(), ExpandFlag::Undetermined)
    }
}

fn first_node(tree: &Tree) -> ExpandedIds {
    tree.roots().first().map(|n| n.id.as_str()).into_iter().collect()
}

/// Cumulative dotted prefixes: `"a.b.c"` gives `["a", "a.b", "a.b.c"]`.
pub fn path_prefixes(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut prefixes: Vec<String> = Vec::new();
    for segment in text.split('.') {
        let next = match prefixes.last() {
            Some(prev) => format!("{}.{}", prev, segment),
            None => segment.to_string(),
        };
        prefixes.push(next);
    }
    prefixes
}
