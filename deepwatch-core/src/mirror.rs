//! Recursive mirror builder
//!
//! Walks a source object and produces, level by level, an intercepted view
//! and an isomorphic monitor. Every object level (the root included) gets
//! its own hook and its own monitor level, so reads at any depth are
//! recorded where they happen.
//!
//! ```text
//! source              view                     monitor
//! { foo: "foo",       View{ foo: "foo",        { foo: false,
//!   bar: { baz } }  →       bar: View{baz} }     bar: { baz: false } }
//! ```
//!
//! Array handling is one level deep: object elements are mirrored, other
//! elements are copied into the view as-is and get no monitor leaf.

use crate::handler::compose_handler;
use crate::hook::SharedHook;
use crate::monitor::{Monitor, MonitorEntry, MonitorNode};
use crate::strategy::Accounting;
use crate::view::{Field, Target, ViewNode};
use deepwatch_types::{Map, Value};
use tracing::trace;

/// Mirror `source` into a view and a monitor
///
/// With `accounting`, every level is wrapped in a monitoring hook bound to
/// its own monitor level and scalar leaves start at the initial value.
/// Without it, every level uses `hook` and the monitor carries structure
/// only.
pub fn build_mirror(
    source: &Map,
    hook: &SharedHook,
    accounting: Option<&Accounting>,
) -> (ViewNode, Monitor) {
    let mut target = Target::default();
    let mut node = MonitorNode::new();

    for (key, value) in source {
        match value {
            Value::Object(child) => {
                let (view, monitor) = build_mirror(child, hook, accounting);
                target.insert(key.as_str(), Field::View(view));
                node.set(key.as_str(), MonitorEntry::Node(monitor));
            }
            Value::Array(items) => {
                let (views, monitors) = mirror_list(items, hook, accounting);
                target.insert(key.as_str(), Field::List(views));
                node.set(key.as_str(), MonitorEntry::List(monitors));
            }
            scalar => {
                target.insert(key.as_str(), Field::Value(scalar.clone()));
                if let Some(accounting) = accounting {
                    node.set(key.as_str(), MonitorEntry::Leaf(accounting.initial_value.clone()));
                }
            }
        }
    }

    trace!(keys = source.len(), "mirrored level");

    let monitor = Monitor::from_node(node);
    let level_hook = match accounting {
        Some(accounting) => compose_handler(monitor.clone(), accounting.strategy.clone()),
        None => hook.clone(),
    };

    (ViewNode::new(target, level_hook), monitor)
}

fn mirror_list(
    items: &[Value],
    hook: &SharedHook,
    accounting: Option<&Accounting>,
) -> (Vec<Field>, Vec<MonitorEntry>) {
    let mut views = Vec::with_capacity(items.len());
    let mut monitors = Vec::with_capacity(items.len());

    for item in items {
        match item {
            Value::Object(child) => {
                let (view, monitor) = build_mirror(child, hook, accounting);
                views.push(Field::View(view));
                monitors.push(MonitorEntry::Node(monitor));
            }
            other => {
                views.push(Field::Value(other.clone()));
                monitors.push(MonitorEntry::Untracked);
            }
        }
    }

    (views, monitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::Passthrough;
    use crate::strategy::MonitorStrategy;
    use std::sync::Arc;

    fn source() -> Map {
        serde_json::from_str(
            r#"{"foo":"foo","bar":{"baz":"baz","cat":{"miu":"miu"}},"list":[{"a":1},2,[3]],"empty":[]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_monitor_structure_without_accounting() {
        let hook: SharedHook = Arc::new(Passthrough);
        let (_, monitor) = build_mirror(&source(), &hook, None);

        assert!(monitor.get("foo").is_none());
        assert!(monitor.get("bar").unwrap().as_node().is_some());
        assert!(monitor.get_path(&"bar.cat".parse().unwrap()).is_some());
        assert!(monitor.leaves().is_empty());
    }

    #[test]
    fn test_leaves_seeded_with_initial_value() {
        let hook: SharedHook = Arc::new(Passthrough);
        let accounting = MonitorStrategy::count().validate().unwrap();
        let (_, monitor) = build_mirror(&source(), &hook, Some(&accounting));

        let leaves: Vec<(String, Value)> = monitor
            .leaves()
            .into_iter()
            .map(|(path, v)| (path.to_string(), v))
            .collect();

        assert_eq!(
            leaves,
            vec![
                ("bar.baz".to_string(), Value::Int(0)),
                ("bar.cat.miu".to_string(), Value::Int(0)),
                ("foo".to_string(), Value::Int(0)),
                ("list[0].a".to_string(), Value::Int(0)),
            ]
        );
    }

    #[test]
    fn test_list_elements() {
        let hook: SharedHook = Arc::new(Passthrough);
        let accounting = MonitorStrategy::flag().validate().unwrap();
        let (view, monitor) = build_mirror(&source(), &hook, Some(&accounting));

        let list = view.get("list");
        let items = list.as_list().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].as_view().is_some());
        assert_eq!(items[1], Value::Int(2));
        assert_eq!(items[2], Value::array([3]));

        let monitors = monitor.get("list").unwrap();
        let monitors = monitors.as_list().unwrap();
        assert_eq!(monitors.len(), 3);
        assert!(matches!(monitors[1], MonitorEntry::Untracked));
        assert!(matches!(monitors[2], MonitorEntry::Untracked));
    }

    #[test]
    fn test_empty_list_yields_empty_sequences() {
        let hook: SharedHook = Arc::new(Passthrough);
        let accounting = MonitorStrategy::flag().validate().unwrap();
        let (view, monitor) = build_mirror(&source(), &hook, Some(&accounting));

        assert_eq!(view.get("empty").as_list().map(<[Field]>::len), Some(0));
        assert_eq!(
            monitor.get("empty").unwrap().as_list().map(<[MonitorEntry]>::len),
            Some(0)
        );
    }
}
