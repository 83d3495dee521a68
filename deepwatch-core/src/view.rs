//! Intercepted views
//!
//! A [`ViewNode`] mirrors one object level of a source document. Its fields
//! are read through [`ViewNode::get`], which always goes through the hook
//! bound to that level. Nested objects are themselves `ViewNode`s with
//! their own hooks; arrays are plain lists of fields and are not
//! intercepted.

use crate::error::{Result, WatchError};
use crate::hook::{HookDebug, SharedHook};
use crate::path::{AccessPath, PathSegment};
use deepwatch_types::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A field stored in a view level
#[derive(Debug, Clone)]
pub enum Field {
    /// Scalar, null or undefined, copied from the source
    Value(Value),

    /// Nested object, wrapped in its own hook
    View(ViewNode),

    /// Array; object elements are views, anything else is copied verbatim
    List(Vec<Field>),
}

impl Field {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&ViewNode> {
        match self {
            Field::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Field]> {
        match self {
            Field::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Field::Value(Value::Undefined))
    }

    /// Materialize into a plain value
    ///
    /// Nested views are read key by key, so their hooks fire.
    pub fn to_value(&self) -> Value {
        match self {
            Field::Value(v) => v.clone(),
            Field::View(view) => view.to_value(),
            Field::List(items) => Value::Array(items.iter().map(Field::to_value).collect()),
        }
    }
}

impl PartialEq<Value> for Field {
    fn eq(&self, other: &Value) -> bool {
        matches!(self, Field::Value(v) if v == other)
    }
}

/// The raw mapping behind one view level
///
/// Hooks receive this and look fields up directly, without interception.
#[derive(Debug, Clone, Default)]
pub struct Target {
    fields: BTreeMap<String, Field>,
}

impl Target {
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, field: Field) {
        self.fields.insert(key.into(), field);
    }
}

/// An intercepting mirror of one object level
///
/// Cloning is cheap and clones share the same level and hook.
#[derive(Clone)]
pub struct ViewNode {
    target: Arc<Target>,
    hook: SharedHook,
}

impl ViewNode {
    pub(crate) fn new(target: Target, hook: SharedHook) -> Self {
        ViewNode {
            target: Arc::new(target),
            hook,
        }
    }

    /// Read a property through this level's hook
    pub fn get(&self, key: &str) -> Field {
        trace!(key, "intercepted read");
        self.hook.read(&self.target, key)
    }

    /// Read along a path, one hook call per object segment
    ///
    /// Index segments select list elements without interception. An index
    /// segment applied to an object level reads the decimal key. Indexing
    /// past the end of a list yields `Value::Undefined`.
    pub fn get_path(&self, path: &AccessPath) -> Result<Field> {
        let mut current = Field::View(self.clone());

        for (depth, segment) in path.segments().iter().enumerate() {
            current = match (&current, segment) {
                (Field::View(view), PathSegment::Key(key)) => view.get(key),
                (Field::View(view), PathSegment::Index(index)) => view.get(&index.to_string()),
                (Field::List(items), PathSegment::Index(index)) => items
                    .get(*index)
                    .cloned()
                    .unwrap_or(Field::Value(Value::Undefined)),
                (Field::List(_), PathSegment::Key(key)) => {
                    return Err(WatchError::invalid_path(
                        path.to_string(),
                        format!("cannot read key `{}` of a list at segment {}", key, depth),
                    ));
                }
                (Field::Value(value), segment) => {
                    return Err(WatchError::invalid_path(
                        path.to_string(),
                        format!("cannot read `{}` of {}", segment, value.type_name()),
                    ));
                }
            };
        }

        Ok(current)
    }

    /// Keys of this level, without firing the hook
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.target.keys()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.target.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Materialize the whole view by reading every key through the hooks
    pub fn to_value(&self) -> Value {
        let map: Map = self
            .target
            .keys()
            .map(|key| (key.to_string(), self.get(key).to_value()))
            .collect();
        Value::Object(map)
    }

    /// True when both handles share the same level
    pub fn ptr_eq(&self, other: &ViewNode) -> bool {
        Arc::ptr_eq(&self.target, &other.target)
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("keys", &self.target.keys().collect::<Vec<_>>())
            .field("hook", &HookDebug(&self.hook))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{Passthrough, ReadHook};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn leaf_view(hook: SharedHook) -> ViewNode {
        let mut target = Target::default();
        target.insert("a", Field::Value(Value::Int(1)));
        target.insert("b", Field::Value(Value::Null));
        ViewNode::new(target, hook)
    }

    #[test]
    fn test_get_fires_hook_once_per_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hook: SharedHook = Arc::new(move |target: &Target, key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Passthrough.read(target, key)
        });

        let view = leaf_view(hook);
        assert_eq!(view.get("a"), Value::Int(1));
        assert_eq!(view.get("b"), Value::Null);
        assert_eq!(view.get("a"), Value::Int(1));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_keys_do_not_fire_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hook: SharedHook = Arc::new(move |target: &Target, key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Passthrough.read(target, key)
        });

        let view = leaf_view(hook);
        assert_eq!(view.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(view.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_get_path_through_list() {
        let inner = leaf_view(Arc::new(Passthrough));
        let mut target = Target::default();
        target.insert(
            "items",
            Field::List(vec![Field::View(inner), Field::Value(Value::Int(7))]),
        );
        let root = ViewNode::new(target, Arc::new(Passthrough));

        let path: AccessPath = "items[0].a".parse().unwrap();
        assert_eq!(root.get_path(&path).unwrap(), Value::Int(1));

        let path: AccessPath = "items[1]".parse().unwrap();
        assert_eq!(root.get_path(&path).unwrap(), Value::Int(7));

        let path: AccessPath = "items[5]".parse().unwrap();
        assert!(root.get_path(&path).unwrap().is_undefined());
    }

    #[test]
    fn test_get_path_through_scalar_fails() {
        let view = leaf_view(Arc::new(Passthrough));
        let path: AccessPath = "a.b".parse().unwrap();

        let err = view.get_path(&path).unwrap_err();
        assert!(matches!(err, WatchError::InvalidPath { .. }));
    }

    #[test]
    fn test_clones_share_level() {
        let view = leaf_view(Arc::new(Passthrough));
        let other = view.clone();
        assert!(view.ptr_eq(&other));
        assert!(!view.ptr_eq(&leaf_view(Arc::new(Passthrough))));
    }
}
