//! Monitor structures
//!
//! A monitor mirrors the shape of a source document and holds one leaf per
//! scalar key. Leaves start at the configured initial value and are only
//! changed by the access strategy bound to the matching view level.
//!
//! Each level sits behind its own lock so that the hook of one view level
//! can update its monitor level while callers inspect the rest.

use crate::path::{AccessPath, PathSegment};
use deepwatch_types::{Map, Value};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::strategy::AccessStrategy;

/// One entry of a monitor level
#[derive(Debug, Clone)]
pub enum MonitorEntry {
    /// Accounting value for a scalar key
    Leaf(Value),

    /// Nested object level
    Node(Monitor),

    /// Array of levels, aligned with the source array
    List(Vec<MonitorEntry>),

    /// Placeholder for a non-object array element
    Untracked,
}

impl MonitorEntry {
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            MonitorEntry::Leaf(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Monitor> {
        match self {
            MonitorEntry::Node(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MonitorEntry]> {
        match self {
            MonitorEntry::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain-data copy of this entry
    pub fn snapshot(&self) -> Value {
        match self {
            MonitorEntry::Leaf(v) => v.clone(),
            MonitorEntry::Node(m) => m.snapshot(),
            MonitorEntry::List(items) => {
                Value::Array(items.iter().map(MonitorEntry::snapshot).collect())
            }
            MonitorEntry::Untracked => Value::Undefined,
        }
    }

    fn collect_leaves(&self, path: AccessPath, out: &mut Vec<(AccessPath, Value)>) {
        match self {
            MonitorEntry::Leaf(v) => out.push((path, v.clone())),
            MonitorEntry::Node(m) => m.collect_leaves(&path, out),
            MonitorEntry::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_leaves(path.index(i), out);
                }
            }
            MonitorEntry::Untracked => {}
        }
    }
}

impl PartialEq<Value> for MonitorEntry {
    fn eq(&self, other: &Value) -> bool {
        matches!(self, MonitorEntry::Leaf(v) if v == other)
    }
}

/// The data of one monitor level, as handed to access strategies
#[derive(Debug, Clone, Default)]
pub struct MonitorNode {
    entries: BTreeMap<String, MonitorEntry>,
}

impl MonitorNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MonitorEntry> {
        self.entries.get(key)
    }

    /// Leaf value at `key`, if the entry is a leaf
    pub fn leaf(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(MonitorEntry::as_leaf)
    }

    pub fn leaf_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.entries.get_mut(key) {
            Some(MonitorEntry::Leaf(v)) => Some(v),
            _ => None,
        }
    }

    /// Insert or replace an entry
    pub fn set(&mut self, key: impl Into<String>, entry: MonitorEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Insert or replace a leaf
    pub fn set_leaf(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.set(key, MonitorEntry::Leaf(value.into()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MonitorEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle to a monitor level
///
/// Cloning is cheap; clones observe the same level. The hook of the
/// matching view level holds one of these clones.
#[derive(Clone, Default)]
pub struct Monitor {
    node: Arc<RwLock<MonitorNode>>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_node(node: MonitorNode) -> Self {
        Monitor {
            node: Arc::new(RwLock::new(node)),
        }
    }

    /// Apply a strategy to this level for a read of `key`
    ///
    /// Holds the write lock for the duration of the strategy call.
    pub(crate) fn record(&self, strategy: &dyn AccessStrategy, key: &str) {
        let mut node = self.node.write();
        strategy.record(&mut node, key);
    }

    pub fn get(&self, key: &str) -> Option<MonitorEntry> {
        self.node.read().get(key).cloned()
    }

    pub fn leaf(&self, key: &str) -> Option<Value> {
        self.node.read().leaf(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.node.read().keys().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.node.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.read().is_empty()
    }

    /// Entry at `path`, or `None` when the path leaves the structure
    pub fn get_path(&self, path: &AccessPath) -> Option<MonitorEntry> {
        let mut current = MonitorEntry::Node(self.clone());

        for segment in path.segments() {
            current = match (&current, segment) {
                (MonitorEntry::Node(m), PathSegment::Key(key)) => m.get(key)?,
                (MonitorEntry::Node(m), PathSegment::Index(index)) => m.get(&index.to_string())?,
                (MonitorEntry::List(items), PathSegment::Index(index)) => items.get(*index)?.clone(),
                _ => return None,
            };
        }

        Some(current)
    }

    /// Leaf value at `path`
    pub fn leaf_at(&self, path: &AccessPath) -> Option<Value> {
        match self.get_path(path)? {
            MonitorEntry::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Plain-data copy of the whole monitor
    pub fn snapshot(&self) -> Value {
        let node = self.node.read();
        let map: Map = node
            .iter()
            .map(|(key, entry)| (key.to_string(), entry.snapshot()))
            .collect();
        Value::Object(map)
    }

    /// Every leaf with its path, in key order
    pub fn leaves(&self) -> Vec<(AccessPath, Value)> {
        let mut out = Vec::new();
        self.collect_leaves(&AccessPath::root(), &mut out);
        out
    }

    /// Paths of leaves still equal to `initial`
    pub fn untouched(&self, initial: &Value) -> Vec<AccessPath> {
        self.leaves()
            .into_iter()
            .filter(|(_, v)| v == initial)
            .map(|(path, _)| path)
            .collect()
    }

    /// Paths of leaves that moved away from `initial`
    pub fn touched(&self, initial: &Value) -> Vec<AccessPath> {
        self.leaves()
            .into_iter()
            .filter(|(_, v)| v != initial)
            .map(|(path, _)| path)
            .collect()
    }

    /// True when both handles share the same level
    pub fn ptr_eq(&self, other: &Monitor) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    fn collect_leaves(&self, prefix: &AccessPath, out: &mut Vec<(AccessPath, Value)>) {
        let node = self.node.read();
        for (key, entry) in node.iter() {
            entry.collect_leaves(prefix.key(key), out);
        }
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Monitor").field(&*self.node.read()).finish()
    }
}
