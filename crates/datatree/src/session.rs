//! A tree plus its navigation state, as a host UI holds them.

use crate::build::{BuildOptions, build_with};
use crate::error::Result;
use crate::locate::{
    IdOption, PathCache, collect_ids, descendants_of_first_two_levels, find_by_id,
    find_path_with_cache,
};
use crate::navigate::{ExpandFlag, ExpandedIds, NavigationState};
use crate::types::{Tree, TreeNode};
use crate::value::Value;

/// Receives search text and selected node ids.
pub type SearchCallback = Box<dyn FnMut(&str)>;

/// Runs after every (re)build.
pub type LoadCallback = Box<dyn FnMut()>;

/// Owns the tree built from the current value and the state for browsing it.
///
/// Loading a new value rebuilds the tree from scratch and resets navigation
/// to its initial state; ids from the previous tree are never carried over.
///
/// # Example
///
/// ```
/// use datatree::v1::{DataTree, ExpandFlag, Value};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = seen.clone();
///
/// let mut data = DataTree::new()
///     .with_on_search(move |text| log.borrow_mut().push(text.to_string()));
/// data.set_data(&Value::from_json_str(r#"{"a": {"b": 1, "c": [1, 2]}}"#).unwrap());
///
/// data.search("a.c");
/// assert!(data.expanded().contains("a.c"));
///
/// data.collapse_all();
/// assert_eq!(data.all_expanded(), ExpandFlag::Collapsed);
/// assert_eq!(*seen.borrow(), vec!["a.c"]);
/// ```
#[derive(Default)]
pub struct DataTree {
    options: BuildOptions,
    tree: Tree,
    node_ids: Vec<IdOption>,
    expand_all_ids: Vec<String>,
    state: NavigationState,
    on_search: Option<SearchCallback>,
    on_initial_load: Option<LoadCallback>,
}

impl DataTree {
    /// An empty session; call [`DataTree::set_data`] to load a value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session for `value` with default options and no callbacks.
    pub fn from_value(value: &Value) -> Self {
        let mut data = Self::new();
        data.set_data(value);
        data
    }

    /// Parse JSON text and build a session for it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::from_value(&Value::from_json_str(json)?))
    }

    /// Options used by subsequent builds.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Called with the text of every search and the id of every selection.
    pub fn with_on_search(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_search = Some(Box::new(callback));
        self
    }

    /// Called after every build.
    pub fn with_on_initial_load(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_initial_load = Some(Box::new(callback));
        self
    }

    /// Rebuild from `value` and reset navigation.
    pub fn set_data(&mut self, value: &Value) {
        self.tree = build_with(value, &self.options);
        self.node_ids = collect_ids(&self.tree);
        self.expand_all_ids = descendants_of_first_two_levels(&self.tree);
        self.state = NavigationState::initialize(&self.tree);
        tracing::debug!(nodes = self.node_ids.len(), "loaded data tree");

        if let Some(callback) = self.on_initial_load.as_mut() {
            callback();
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Flat id list for selection controls.
    pub fn node_ids(&self) -> &[IdOption] {
        &self.node_ids
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn expanded(&self) -> &ExpandedIds {
        &self.state.expanded
    }

    pub fn all_expanded(&self) -> ExpandFlag {
        self.state.all_expanded
    }

    /// Replace the expanded set directly. The flag becomes undetermined.
    pub fn set_expanded<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state = NavigationState::new(ids.into_iter().collect(), ExpandFlag::Undetermined);
    }

    pub fn expand_all(&mut self) {
        self.state = NavigationState::new(
            self.expand_all_ids.iter().map(String::as_str).collect(),
            ExpandFlag::Expanded,
        );
    }

    pub fn collapse_all(&mut self) {
        self.state = self.state.collapse_all(&self.tree);
    }

    pub fn toggle(&mut self, node_id: &str) {
        self.state = self.state.toggle(&self.tree, node_id);
    }

    /// Toggle `node_id`, then report it to the search callback.
    pub fn select(&mut self, node_id: &str) {
        self.toggle(node_id);
        if let Some(callback) = self.on_search.as_mut() {
            callback(node_id);
        }
    }

    /// Report `text` to the search callback, then reveal the ids it names.
    pub fn search(&mut self, text: &str) {
        if let Some(callback) = self.on_search.as_mut() {
            callback(text);
        }
        self.state = self.state.search_and_expand(text);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&TreeNode> {
        find_by_id(id, &self.tree)
    }

    /// Ancestor id chain for `id`, reusing `cache` if given.
    pub fn find_path(&self, id: &str, cache: Option<&mut PathCache>) -> Option<Vec<String>> {
        match cache {
            Some(cache) => find_path_with_cache(id, &self.tree, cache),
            None => find_path_with_cache(id, &self.tree, &mut PathCache::new()),
        }
    }
}

impl std::fmt::Debug for DataTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTree")
            .field("options", &self.options)
            .field("nodes", &self.node_ids.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatOptions;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn value() -> Value {
        Value::from(json!({"a": {"b": 1, "c": [1, 2]}, "d": {"e": {"f": 1}}}))
    }

    fn expanded(data: &DataTree) -> Vec<&str> {
        data.expanded().iter().collect()
    }

    #[test]
    fn test_initial_state() {
        let data = DataTree::from_value(&value());
        assert_eq!(expanded(&data), ["a"]);
        assert_eq!(data.all_expanded(), ExpandFlag::Undetermined);
        assert_eq!(data.node_ids().len(), 8);
    }

    #[test]
    fn test_empty_session() {
        let mut data = DataTree::new();
        assert!(data.tree().is_empty());
        data.collapse_all();
        assert!(data.expanded().is_empty());
        data.expand_all();
        assert!(data.expanded().is_empty());
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let mut data = DataTree::from_value(&value());
        data.expand_all();
        assert_eq!(expanded(&data), ["a", "d.e", "d"]);
        assert_eq!(data.all_expanded(), ExpandFlag::Expanded);

        data.collapse_all();
        assert_eq!(expanded(&data), ["a"]);
        assert_eq!(data.all_expanded(), ExpandFlag::Collapsed);
    }

    #[test]
    fn test_search_reports_text_even_without_match() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut data =
            DataTree::new().with_on_search(move |t| log.borrow_mut().push(t.to_string()));
        data.set_data(&value());

        data.search("x.y");
        assert_eq!(expanded(&data), ["x", "x.y"]);
        data.search("");
        assert!(data.expanded().is_empty());
        assert_eq!(*seen.borrow(), vec!["x.y".to_string(), String::new()]);
    }

    #[test]
    fn test_select_toggles_and_reports() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut data =
            DataTree::new().with_on_search(move |t| log.borrow_mut().push(t.to_string()));
        data.set_data(&value());

        data.select("d");
        assert_eq!(expanded(&data), ["a", "d", "d.e"]);
        data.select("d");
        assert_eq!(expanded(&data), ["a"]);
        assert_eq!(*seen.borrow(), vec!["d", "d"]);
    }

    #[test]
    fn test_set_data_resets_state_and_fires_load() {
        let loads = Rc::new(Cell::new(0));
        let counter = loads.clone();
        let mut data = DataTree::new().with_on_initial_load(move || counter.set(counter.get() + 1));

        data.set_data(&value());
        data.expand_all();
        data.set_data(&Value::from(json!({"z": [1]})));

        assert_eq!(loads.get(), 2);
        assert_eq!(expanded(&data), ["z"]);
        assert_eq!(data.all_expanded(), ExpandFlag::Undetermined);
        assert!(data.find_by_id("a").is_none());
    }

    #[test]
    fn test_set_expanded_resets_flag() {
        let mut data = DataTree::from_value(&value());
        data.expand_all();
        data.set_expanded(["a", "a.c"]);
        assert_eq!(expanded(&data), ["a", "a.c"]);
        assert_eq!(data.all_expanded(), ExpandFlag::Undetermined);
    }

    #[test]
    fn test_find_path_with_and_without_cache() {
        let data = DataTree::from_value(&value());
        let mut cache = PathCache::new();
        assert_eq!(
            data.find_path("d.e.f", Some(&mut cache)).unwrap(),
            vec!["d", "d.e", "d.e.f"]
        );
        assert_eq!(data.find_path("a.c.0", None).unwrap().len(), 3);
        assert!(data.find_path("q", None).is_none());
    }

    #[test]
    fn test_options_apply_to_builds() {
        let options = BuildOptions {
            format: FormatOptions { truncate_at: 2 },
        };
        let mut data = DataTree::new().with_options(options);
        data.set_data(&Value::from(json!({"s": "abcdef"})));
        let node = data.find_by_id("s").unwrap();
        assert_eq!(
            node.value.format.as_ref().unwrap().truncated.as_deref(),
            Some("ab...")
        );
    }

    #[test]
    fn test_from_json_str() {
        let data = DataTree::from_json_str(r#"[1, 2, 3]"#).unwrap();
        assert_eq!(data.node_ids().len(), 3);
        assert!(DataTree::from_json_str("[1,").is_err());
    }
}
