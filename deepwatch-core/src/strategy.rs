//! Access strategies
//!
//! A strategy decides how a monitor level changes when a key of the
//! matching view level is read. It receives the monitor level and the key,
//! and mutates that level in place.
//!
//! Two strategies are built in:
//!
//! - [`FlagStrategy`]: flips a falsy leaf to `true` ("was this ever read")
//! - [`CountStrategy`]: increments a numeric leaf on every read

use crate::error::{Result, WatchError};
use crate::monitor::{MonitorEntry, MonitorNode};
use deepwatch_types::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Accounting applied to a monitor level on every intercepted read
///
/// `record` runs while the level's write lock is held, and that lock is not
/// reentrant. A strategy must only touch the `&mut MonitorNode` it is
/// given; reading a captured [`Monitor`](crate::Monitor) handle to the same
/// level from inside `record` (`leaf`, `snapshot`, `get`, ...) deadlocks.
pub trait AccessStrategy: Send + Sync {
    /// Record a read of `key` into `node`
    fn record(&self, node: &mut MonitorNode, key: &str);
}

impl<F> AccessStrategy for F
where
    F: Fn(&mut MonitorNode, &str) + Send + Sync,
{
    fn record(&self, node: &mut MonitorNode, key: &str) {
        self(node, key)
    }
}

/// Shared, type-erased strategy
pub type SharedStrategy = Arc<dyn AccessStrategy>;

/// Sets a leaf to `true` unless it is already truthy
///
/// Reading a key with no monitor entry creates a `true` leaf for it.
/// Nested levels and lists count as truthy and are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagStrategy;

impl AccessStrategy for FlagStrategy {
    fn record(&self, node: &mut MonitorNode, key: &str) {
        let seen = match node.get(key) {
            None => false,
            Some(MonitorEntry::Leaf(v)) => v.is_truthy(),
            Some(_) => true,
        };
        if !seen {
            node.set_leaf(key, true);
        }
    }
}

/// Increments numeric leaves, ignores everything else
///
/// An integer leaf at `i64::MAX` continues counting as a float.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountStrategy;

impl AccessStrategy for CountStrategy {
    fn record(&self, node: &mut MonitorNode, key: &str) {
        let Some(leaf) = node.leaf_mut(key) else {
            return;
        };
        match leaf {
            Value::Int(n) => {
                *leaf = match n.checked_add(1) {
                    Some(next) => Value::Int(next),
                    None => Value::Float(*n as f64 + 1.0),
                };
            }
            Value::Float(x) => *x += 1.0,
            _ => {}
        }
    }
}

/// Look up a built-in strategy by name
pub fn builtin(name: &str) -> Option<SharedStrategy> {
    match name {
        "flag" => Some(Arc::new(FlagStrategy)),
        "count" => Some(Arc::new(CountStrategy)),
        _ => None,
    }
}

/// Initial leaf value that pairs with a built-in strategy
pub fn builtin_initial_value(name: &str) -> Value {
    match name {
        "count" => Value::Int(0),
        _ => Value::Bool(false),
    }
}

/// Strategy plus the value every monitor leaf starts at
///
/// `strategy` is `None` when the caller named a strategy that could not be
/// resolved; [`build_monitored_view`](crate::build_monitored_view) rejects
/// such a configuration.
#[derive(Clone)]
pub struct MonitorStrategy {
    pub strategy: Option<SharedStrategy>,
    pub initial_value: Value,
}

impl MonitorStrategy {
    pub fn new(strategy: impl AccessStrategy + 'static, initial_value: impl Into<Value>) -> Self {
        MonitorStrategy {
            strategy: Some(Arc::new(strategy)),
            initial_value: initial_value.into(),
        }
    }

    /// [`FlagStrategy`] starting at `false`
    pub fn flag() -> Self {
        Self::new(FlagStrategy, false)
    }

    /// [`CountStrategy`] starting at `0`
    pub fn count() -> Self {
        Self::new(CountStrategy, 0)
    }

    /// Resolve a named built-in, with an optional initial value override
    pub fn named(name: &str, initial_value: Option<Value>) -> Self {
        let strategy = builtin(name);
        if strategy.is_none() {
            warn!(name, "unknown monitor strategy");
        }
        MonitorStrategy {
            strategy,
            initial_value: initial_value.unwrap_or_else(|| builtin_initial_value(name)),
        }
    }

    /// Check that a strategy is present
    pub(crate) fn validate(self) -> Result<Accounting> {
        match self.strategy {
            Some(strategy) => Ok(Accounting {
                strategy,
                initial_value: self.initial_value,
            }),
            None => Err(WatchError::InvalidArgument(
                "monitor strategy must be callable".to_string(),
            )),
        }
    }
}

impl Default for MonitorStrategy {
    fn default() -> Self {
        Self::flag()
    }
}

impl fmt::Debug for MonitorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorStrategy")
            .field("strategy", &self.strategy.as_ref().map(|_| "<strategy>"))
            .field("initial_value", &self.initial_value)
            .finish()
    }
}

/// A validated strategy as threaded through the mirror builder
#[derive(Clone)]
pub struct Accounting {
    pub strategy: SharedStrategy,
    pub initial_value: Value,
}

impl fmt::Debug for Accounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounting")
            .field("initial_value", &self.initial_value)
            .finish_non_exhaustive()
    }
}
