//! Monitoring hook composition

use crate::hook::{Passthrough, ReadHook, SharedHook};
use crate::monitor::Monitor;
use crate::strategy::SharedStrategy;
use crate::view::{Field, Target};
use std::sync::Arc;
use tracing::trace;

/// Hook that records each read into a monitor level, then passes through
///
/// Any custom hook the caller configured elsewhere is not consulted;
/// monitoring takes precedence at the levels where it is installed.
pub struct MonitoredHook {
    monitor: Monitor,
    strategy: SharedStrategy,
}

impl MonitoredHook {
    pub fn new(monitor: Monitor, strategy: SharedStrategy) -> Self {
        MonitoredHook { monitor, strategy }
    }
}

impl ReadHook for MonitoredHook {
    fn read(&self, target: &Target, key: &str) -> Field {
        self.monitor.record(self.strategy.as_ref(), key);
        trace!(key, "recorded read");
        Passthrough.read(target, key)
    }
}

impl std::fmt::Debug for MonitoredHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoredHook")
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}

/// Build the hook for one monitored view level
pub fn compose_handler(monitor: Monitor, strategy: SharedStrategy) -> SharedHook {
    Arc::new(MonitoredHook::new(monitor, strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorNode;
    use crate::strategy::FlagStrategy;
    use deepwatch_types::Value;

    #[test]
    fn test_records_then_returns_stored_value() {
        let mut node = MonitorNode::new();
        node.set_leaf("foo", false);
        node.set_leaf("bar", false);
        let monitor = Monitor::from_node(node);

        let mut target = Target::default();
        target.insert("foo", Field::Value(Value::from("foo")));
        target.insert("bar", Field::Value(Value::from("bar")));

        let hook = compose_handler(monitor.clone(), Arc::new(FlagStrategy));
        assert_eq!(hook.read(&target, "foo"), Value::from("foo"));

        assert_eq!(monitor.leaf("foo"), Some(Value::Bool(true)));
        assert_eq!(monitor.leaf("bar"), Some(Value::Bool(false)));
    }

    #[test]
    fn test_strategy_sees_missing_keys() {
        let monitor = Monitor::new();
        let hook = compose_handler(monitor.clone(), Arc::new(FlagStrategy));

        assert!(hook.read(&Target::default(), "absent").is_undefined());
        assert_eq!(monitor.leaf("absent"), Some(Value::Bool(true)));
    }
}
