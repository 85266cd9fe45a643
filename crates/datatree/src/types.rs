use serde::{Serialize, Serializer};
use std::fmt;

use crate::value::Value;

/// Semantic type of a tree node.
///
/// Serialises as its lowercase name, e.g. `"integer"` or `"circular"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    /// A string that holds only a decimal number, e.g. `"123"` or `"4.5"`.
    Number,
    Integer,
    Float,
    Boolean,
    Object,
    Array,
    Null,
    Undefined,
    Function,
    Symbol,
    BigInt,
    Date,
    RegExp,
    Error,
    /// A `data:image/...` URL.
    Image,
    /// Marker for a container reached a second time during one build.
    Circular,
    Unknown,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 18] = [
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::Boolean,
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::Null,
        TypeTag::Undefined,
        TypeTag::Function,
        TypeTag::Symbol,
        TypeTag::BigInt,
        TypeTag::Date,
        TypeTag::RegExp,
        TypeTag::Error,
        TypeTag::Image,
        TypeTag::Circular,
        TypeTag::Unknown,
    ];

    /// Object and Array; the builder descends into these.
    pub fn is_composite(self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::Function => "function",
            TypeTag::Symbol => "symbol",
            TypeTag::BigInt => "bigint",
            TypeTag::Date => "date",
            TypeTag::RegExp => "regexp",
            TypeTag::Error => "error",
            TypeTag::Image => "image",
            TypeTag::Circular => "circular",
            TypeTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Node values
// ============================================================================

/// Display text for a node.
///
/// `truncated` is only set when `raw` was longer than the truncation
/// threshold; renderers show it in preference to `raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedValue {
    pub raw: String,
    pub truncated: Option<String>,
}

impl FormattedValue {
    /// Text that was never shortened.
    pub fn untruncated(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            truncated: None,
        }
    }

    /// The text a renderer should show by default.
    pub fn display(&self) -> &str {
        self.truncated.as_deref().unwrap_or(&self.raw)
    }
}

/// The value carried by a node.
///
/// `format` is `None` for Object and Array nodes; their contents are shown
/// through their children. A container `raw` (Object, Array, Circular) is
/// kept as a handle but serialises as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct NodeValue {
    #[serde(serialize_with = "serialize_raw")]
    pub raw: Value,
    pub format: Option<FormattedValue>,
}

fn serialize_raw<S: Serializer>(raw: &Value, serializer: S) -> Result<S::Ok, S::Error> {
    match raw {
        Value::Array(_) | Value::Object(_) => serializer.serialize_none(),
        leaf => leaf.serialize(serializer),
    }
}

// ============================================================================
// Tree
// ============================================================================

/// One node of a built tree.
///
/// # JSON shape
///
/// ```json
/// {
///   "type": "integer",
///   "key": "0",
///   "id": "a.c.0",
///   "value": { "raw": 1, "format": { "raw": "1", "truncated": null } },
///   "children": null
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    #[serde(rename = "type")]
    pub node_type: TypeTag,
    /// Edge label from the parent; `None` only for a leaf root.
    pub key: Option<String>,
    /// Dot-joined keys from the root; unique within one tree.
    pub id: String,
    pub value: NodeValue,
    /// `None` for leaves, Circular markers, and empty containers.
    pub children: Option<Vec<TreeNode>>,
}

// Children are detached into a work list so that dropping a deep tree
// never recurses.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let Some(mut pending) = self.children.take() else {
            return;
        };
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.take().unwrap_or_default());
        }
    }
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Direct children, empty for leaves.
    pub fn child_nodes(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Output of a build.
///
/// A container at the root has no node of its own: its entries become the
/// top-level nodes of a `Forest`. A leaf at the root becomes a single `Node`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Tree {
    /// The root was an empty container. Serialises as `null`.
    #[default]
    Empty,
    Node(TreeNode),
    Forest(Vec<TreeNode>),
}

impl Tree {
    /// Top-level nodes, whatever the variant.
    pub fn roots(&self) -> &[TreeNode] {
        match self {
            Tree::Empty => &[],
            Tree::Node(node) => std::slice::from_ref(node),
            Tree::Forest(nodes) => nodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots().is_empty()
    }
}
