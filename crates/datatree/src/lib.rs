#![doc = include_str!("../README.md")]

mod build;
mod classify;
mod error;
mod format;
mod locate;
mod navigate;
mod session;
mod types;
mod value;

pub mod v1 {
    //! Versioned public API for datatree values, trees, and navigation.
    //!
    //! Everything you need is re-exported from this module. Types are
    //! organized into four groups:
    //!
    //! # Values
    //!
    //! What a tree is built from:
    //!
    //! - [`Value`] — any nested value: primitives, dates, regexps, errors,
    //!   arrays and objects
    //! - [`ArrayRef`], [`ObjectRef`] — shared container handles; cycles are
    //!   allowed
    //!
    //! # Trees
    //!
    //! What [`build`] produces:
    //!
    //! - [`Tree`] — empty, a single leaf node, or a forest of top-level nodes
    //! - [`TreeNode`] — one node: type, key, dotted id, value, children
    //! - [`TypeTag`] — the semantic type from [`classify`]
    //! - [`NodeValue`], [`FormattedValue`] — raw value plus display text
    //!
    //! # Navigation
    //!
    //! Which nodes are open:
    //!
    //! - [`NavigationState`] — expanded ids plus the [`ExpandFlag`]
    //! - [`ExpandedIds`] — insertion-ordered id set
    //! - [`DataTree`] — tree, ids, state and callbacks held together
    //!
    //! # Configuration and errors
    //!
    //! - [`BuildOptions`], [`FormatOptions`] — truncation threshold
    //! - [`DataTreeError`], [`Result`] — for parsing documents
    //!
    //! # Example — build, locate, and expand
    //!
    //! ```
    //! use datatree::v1::*;
    //!
    //! let value = Value::from_json_str(r#"{"a": {"b": 1, "c": [1, 2]}}"#).unwrap();
    //! let tree = build(&value);
    //!
    //! let node = locate::find_by_id("a.c.1", &tree).unwrap();
    //! assert_eq!(node.node_type, TypeTag::Integer);
    //! assert_eq!(locate::find_path("a.c.1", &tree).unwrap(), ["a", "a.c", "a.c.1"]);
    //!
    //! let state = NavigationState::initialize(&tree);
    //! assert_eq!(state.expanded.as_slice(), ["a"]);
    //!
    //! let state = state.toggle(&tree, "a");
    //! assert_eq!(state.expanded.as_slice(), ["a", "a.b", "a.c"]);
    //!
    //! let json = serde_json::to_string(&tree).unwrap();
    //! assert!(json.contains(r#""id":"a.c.1""#));
    //! ```

    /// Node lookup by id, ancestor paths, and id listings.
    ///
    /// Every function walks the tree with an explicit stack, so tree depth
    /// is not limited by the call stack.
    ///
    /// # Example — seed a selection control
    ///
    /// ```
    /// use datatree::v1::{build, locate, Value};
    ///
    /// let tree = build(&Value::object([("x", Value::array(["p", "q"]))]));
    /// let labels: Vec<String> = locate::collect_ids(&tree)
    ///     .into_iter()
    ///     .map(|option| option.label)
    ///     .collect();
    /// assert_eq!(labels, ["x", "x.0", "x.1"]);
    /// ```
    pub mod locate {
        pub use crate::locate::{
            IdOption, PathCache, collect_ids, descendants_of_first_two_levels, find_by_id,
            find_path, find_path_with_cache,
        };
    }

    /// Display text and truncation.
    pub mod format {
        pub use crate::format::{
            DEFAULT_TRUNCATE_AT, ELLIPSIS, FormatOptions, Truncation, display_string,
            format_value, format_value_with, number_to_string, to_fixed_2, truncate,
        };
    }

    pub use crate::build::{BuildOptions, CIRCULAR_KEY, TreeStats, build, build_with};
    pub use crate::classify::{IMAGE_PREFIX, classify, is_numeric_string};
    pub use crate::error::{DataTreeError, Result};
    pub use crate::format::FormatOptions;
    pub use crate::navigate::{ExpandFlag, ExpandedIds, NavigationState, path_prefixes};
    pub use crate::session::{DataTree, LoadCallback, SearchCallback};
    pub use crate::types::{FormattedValue, NodeValue, Tree, TreeNode, TypeTag};
    pub use crate::value::{ArrayRef, CIRCULAR_MARKER, ObjectRef, Value};
}
