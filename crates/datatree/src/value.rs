//! The runtime value model that trees are built from.
//!
//! [`Value`] covers every shape the classifier knows about. Containers are
//! shared handles ([`ArrayRef`], [`ObjectRef`]) so the same array or object
//! can appear at several positions, including inside itself.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

use crate::error;

/// Marker text substituted wherever a container is re-entered.
pub const CIRCULAR_MARKER: &str = "[Circular Reference]";

/// An arbitrary nested value under inspection.
///
/// Leaf variants compare structurally; `Array` and `Object` compare by
/// identity, so two distinct containers with equal contents are not equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    BigInt(i128),
    /// A symbol with an optional description.
    Symbol(Option<String>),
    /// A callable, carried as its source text.
    Function(String),
    Date(DateTime<Utc>),
    RegExp {
        source: String,
        flags: String,
    },
    Error {
        name: String,
        message: String,
    },
    Array(ArrayRef),
    Object(ObjectRef),
    /// A host value with no enumerable structure.
    Opaque(String),
}

// ============================================================================
// Shared containers
// ============================================================================

/// Shared, mutable handle to an ordered list of values.
#[derive(Clone, Default)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Borrow the items. Panics if a mutable borrow is live.
    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    /// Identity of the underlying allocation, stable while any handle lives.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ArrayRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ArrayRef {
    // Contents are omitted: a cyclic array would never finish printing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayRef(len={}, @{:#x})", self.len(), self.ptr_id())
    }
}

/// Shared, mutable handle to an object's properties in enumeration order.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<Vec<(String, Value)>>>);

impl ObjectRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Borrow the entries. Panics if a mutable borrow is live.
    pub fn entries(&self) -> Ref<'_, Vec<(String, Value)>> {
        self.0.borrow()
    }

    /// Identity of the underlying allocation, stable while any handle lives.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(len={}, @{:#x})", self.len(), self.ptr_id())
    }
}

// Dropping the last handle to a container moves the contents of every
// uniquely-owned descendant into one work list, so deep values drop without
// recursion. Shared or borrowed containers are left alone.

impl Drop for ArrayRef {
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut items) = self.0.try_borrow_mut() {
            dismantle(std::mem::take(&mut *items));
        }
    }
}

impl Drop for ObjectRef {
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut entries) = self.0.try_borrow_mut() {
            dismantle(entries.drain(..).map(|(_, v)| v).collect());
        }
    }
}

fn dismantle(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(array) if Rc::strong_count(&array.0) == 1 => {
                if let Ok(mut items) = array.0.try_borrow_mut() {
                    pending.append(&mut items);
                }
            }
            Value::Object(object) if Rc::strong_count(&object.0) == 1 => {
                if let Ok(mut entries) = object.0.try_borrow_mut() {
                    pending.extend(entries.drain(..).map(|(_, v)| v));
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// Constructors and accessors
// ============================================================================

impl Value {
    /// Build a fresh array from any iterator of values.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(ArrayRef::new(items.into_iter().map(Into::into).collect()))
    }

    /// Build a fresh object from `(key, value)` pairs, keeping their order.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let obj = ObjectRef::new();
        for (k, v) in entries {
            obj.insert(k, v);
        }
        Value::Object(obj)
    }

    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::RegExp {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Value::Error {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Identity of a container value; `None` for leaves.
    pub fn container_id(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.ptr_id()),
            Value::Object(o) => Some(o.ptr_id()),
            _ => None,
        }
    }

    /// Snapshot of a container's `(key, value)` entries in enumeration order.
    ///
    /// Array entries are keyed by their index. Leaves yield `None`.
    pub fn entries(&self) -> Option<Vec<(String, Value)>> {
        match self {
            Value::Array(a) => Some(
                a.items()
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v.clone()))
                    .collect(),
            ),
            Value::Object(o) => Some(o.entries().clone()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical JSON rendering.
    ///
    /// Follows the usual serialiser conventions for values JSON cannot hold:
    /// `undefined`, functions and symbols are dropped from objects and become
    /// `null` inside arrays, non-finite numbers become `null`, dates become
    /// ISO strings, regexps and errors become `{}`. A container that contains
    /// itself is cut at the point of re-entry with [`CIRCULAR_MARKER`].
    pub fn to_json(&self) -> serde_json::Value {
        let mut on_stack = HashSet::new();
        self.to_json_guarded(&mut on_stack)
            .unwrap_or(serde_json::Value::Null)
    }

    fn to_json_guarded(&self, on_stack: &mut HashSet<usize>) -> Option<serde_json::Value> {
        use serde_json::Value as J;

        let json = match self {
            Value::Undefined | Value::Function(_) | Value::Symbol(_) => return None,
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Number(n) if !n.is_finite() => J::Null,
            // Integral values print without a fractional part.
            Value::Number(n) if n % 1.0 == 0.0 && n.abs() < 9.0e15 => J::from(*n as i64),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::String(s) => J::String(s.clone()),
            Value::BigInt(i) => J::String(i.to_string()),
            Value::Date(d) => J::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::RegExp { .. } | Value::Error { .. } => J::Object(serde_json::Map::new()),
            Value::Opaque(s) => J::String(s.clone()),
            Value::Array(a) => {
                if !on_stack.insert(a.ptr_id()) {
                    return Some(J::String(CIRCULAR_MARKER.to_string()));
                }
                let items = a
                    .items()
                    .iter()
                    .map(|v| v.to_json_guarded(on_stack).unwrap_or(J::Null))
                    .collect();
                on_stack.remove(&a.ptr_id());
                J::Array(items)
            }
            Value::Object(o) => {
                if !on_stack.insert(o.ptr_id()) {
                    return Some(J::String(CIRCULAR_MARKER.to_string()));
                }
                let mut map = serde_json::Map::new();
                for (k, v) in o.entries().iter() {
                    if let Some(json) = v.to_json_guarded(on_stack) {
                        map.insert(k.clone(), json);
                    }
                }
                on_stack.remove(&o.ptr_id());
                J::Object(map)
            }
        };
        Some(json)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl Value {
    /// Parse JSON text into a value tree.
    pub fn from_json_str(json: &str) -> error::Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Ok(parsed.into())
    }

    /// Parse JSON from a reader, e.g. stdin.
    pub fn from_json_reader(reader: impl Read) -> error::Result<Self> {
        let parsed: serde_json::Value = serde_json::from_reader(reader)?;
        Ok(parsed.into())
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match json {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => Value::String(s),
            J::Array(items) => Value::array(items.into_iter().map(Value::from)),
            J::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Value::Array(a)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
