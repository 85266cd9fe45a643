//! Conversion of a [`Value`] into a [`Tree`].
//!
//! Construction is depth-first over an explicit work stack, so input nesting
//! depth never turns into call-stack depth.

use serde::Serialize;
use std::collections::HashSet;

use crate::classify::classify;
use crate::format::{FormatOptions, format_value_with};
use crate::types::{NodeValue, Tree, TreeNode, TypeTag};
use crate::value::Value;

/// Key given to the marker node that replaces a re-entered container.
pub const CIRCULAR_KEY: &str = "Circular";

/// Options for [`build_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub format: FormatOptions,
}

/// Build a tree from `value` with default options.
///
/// # Examples
///
/// ```
/// use datatree::v1::{build, Tree, TypeTag, Value};
///
/// let value = Value::object([(
///     "a",
///     Value::object([("b", Value::from(1)), ("c", Value::array([1, 2]))]),
/// )]);
///
/// let Tree::Forest(roots) = build(&value) else { unreachable!() };
/// assert_eq!(roots[0].id, "a");
///
/// let a = roots[0].child_nodes();
/// assert_eq!(a[0].id, "a.b");
/// assert_eq!(a[1].id, "a.c");
/// assert_eq!(a[1].child_nodes()[1].id, "a.c.1");
/// assert_eq!(a[1].child_nodes()[1].node_type, TypeTag::Integer);
/// ```
pub fn build(value: &Value) -> Tree {
    build_with(value, &BuildOptions::default())
}

/// A container whose entries are still being turned into nodes.
struct Frame {
    id: String,
    key: Option<String>,
    node_type: TypeTag,
    value: Value,
    entries: std::vec::IntoIter<(String, Value)>,
    children: Vec<TreeNode>,
}

impl Frame {
    fn open(id: String, key: Option<String>, node_type: TypeTag, value: Value) -> Self {
        let entries = value.entries().unwrap_or_default().into_iter();
        Self {
            id,
            key,
            node_type,
            value,
            entries,
            children: Vec::new(),
        }
    }

    fn close(self) -> TreeNode {
        TreeNode {
            node_type: self.node_type,
            key: self.key,
            id: self.id,
            value: NodeValue {
                raw: self.value,
                format: None,
            },
            children: (!self.children.is_empty()).then_some(self.children),
        }
    }
}

/// Build a tree from `value`.
///
/// Containers are tracked by identity for the whole build: the second time
/// any array or object is reached, whether through a cycle or a shared
/// reference, a [`TypeTag::Circular`] node is emitted in its place.
pub fn build_with(value: &Value, options: &BuildOptions) -> Tree {
    let root_type = classify(value);
    if !root_type.is_composite() {
        return Tree::Node(leaf_node(value, root_type, String::new(), None, options));
    }

    let mut visited: HashSet<usize> = HashSet::new();
    let mut circular = 0usize;
    let mut nodes = 0usize;

    visited.extend(value.container_id());
    let mut stack = vec![Frame::open(String::new(), None, root_type, value.clone())];

    while let Some(top) = stack.last_mut() {
        let Some((key, child)) = top.entries.next() else {
            let Some(done) = stack.pop() else { break };
            match stack.last_mut() {
                Some(parent) => {
                    nodes += 1;
                    parent.children.push(done.close());
                }
                None => {
                    tracing::debug!(nodes, circular, "built tree");
                    return if done.children.is_empty() {
                        Tree::Empty
                    } else {
                        Tree::Forest(done.children)
                    };
                }
            }
            continue;
        };

        let id = child_id(&top.id, &key);
        let child_type = classify(&child);

        if !child_type.is_composite() {
            nodes += 1;
            top.children.push(leaf_node(&child, child_type, id, Some(key), options));
        } else if child.container_id().is_some_and(|ptr| !visited.insert(ptr)) {
            nodes += 1;
            circular += 1;
            top.children.push(circular_node(child, &id, options));
        } else {
            stack.push(Frame::open(id, Some(key), child_type, child));
        }
    }

    Tree::Empty
}

fn child_id(parent_id: &str, key: &str) -> String {
    if parent_id.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent_id, key)
    }
}

fn leaf_node(
    value: &Value,
    node_type: TypeTag,
    id: String,
    key: Option<String>,
    options: &BuildOptions,
) -> TreeNode {
    TreeNode {
        node_type,
        key,
        id,
        value: NodeValue {
            raw: value.clone(),
            format: Some(format_value_with(value, node_type, &options.format)),
        },
        children: None,
    }
}

fn circular_node(value: Value, position_id: &str, options: &BuildOptions) -> TreeNode {
    let format = format_value_with(&value, TypeTag::Circular, &options.format);
    TreeNode {
        node_type: TypeTag::Circular,
        key: Some(CIRCULAR_KEY.to_string()),
        id: child_id(position_id, CIRCULAR_KEY),
        value: NodeValue {
            raw: value,
            format: Some(format),
        },
        children: None,
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub containers: usize,
    pub circular: usize,
    /// Depth of the deepest node; top-level nodes have depth 0.
    pub max_depth: usize,
}

impl TreeStats {
    pub fn of(tree: &Tree) -> Self {
        let mut stats = Self::default();
        let mut stack: Vec<(&TreeNode, usize)> = tree.roots().iter().map(|n| (n, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            match node.node_type {
                TypeTag::Circular => stats.circular += 1,
                t if t.is_composite() => stats.containers += 1,
                _ => stats.leaves += 1,
            }
            stack.extend(node.child_nodes().iter().map(|c| (c, depth + 1)));
        }

        stats
    }
}
