//! Deepwatch read interception and access monitoring
//!
//! This crate builds, from a nested plain-data document, two companion
//! structures that share its shape:
//!
//! - an **intercepted view** ([`ViewNode`]) that routes every property read
//!   through a hook instead of returning the stored value directly, and
//! - a **monitor** ([`Monitor`]) that records, through a pluggable
//!   [`AccessStrategy`], which properties of the view have been read.
//!
//! The source document is never mutated. Both structures are built eagerly,
//! and every object level, not only the root, carries its own hook and its
//! own monitor level, so reads at any depth are individually observable.
//!
//! # Architecture
//!
//! ```text
//! Map ──build_mirror──┬──▶ ViewNode (hook per level) ──get(key)──┐
//!                     │                                          │
//!                     └──▶ Monitor  (lock per level) ◀──strategy─┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use deepwatch_core::{build_monitored_view, Value};
//!
//! let source = serde_json::from_str(r#"{"foo":"foo","bar":{"baz":"baz","zoo":"zoo"}}"#).unwrap();
//! let (view, monitor) = build_monitored_view(&source, None).unwrap();
//!
//! assert_eq!(view.get("foo"), Value::from("foo"));
//! let bar = view.get("bar");
//! assert_eq!(bar.as_view().unwrap().get("zoo"), Value::from("zoo"));
//!
//! assert_eq!(monitor.leaf("foo"), Some(Value::Bool(true)));
//! assert_eq!(monitor.leaf_at(&"bar.baz".parse().unwrap()), Some(Value::Bool(false)));
//! assert_eq!(monitor.leaf_at(&"bar.zoo".parse().unwrap()), Some(Value::Bool(true)));
//! ```

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod handler;
pub mod hook;
pub mod mirror;
pub mod monitor;
pub mod path;
pub mod source;
pub mod strategy;
pub mod view;

pub use config::WatchConfig;
pub use error::{Result, WatchError};
pub use handler::{compose_handler, MonitoredHook};
pub use hook::{Passthrough, ReadHook, SharedHook};
pub use mirror::build_mirror;
pub use monitor::{Monitor, MonitorEntry, MonitorNode};
pub use path::{AccessPath, PathSegment};
pub use source::{load_source, parse_source, SourceFormat};
pub use strategy::{
    AccessStrategy, Accounting, CountStrategy, FlagStrategy, MonitorStrategy, SharedStrategy,
};
pub use view::{Field, Target, ViewNode};

pub use deepwatch_types::{Map, Value};

use std::sync::Arc;
use tracing::debug;

/// Build an intercepted view whose every level reads through `hook`
pub fn build_intercepted_view(source: &Map, hook: impl ReadHook + 'static) -> ViewNode {
    debug!(keys = source.len(), "building intercepted view");
    let hook: SharedHook = Arc::new(hook);
    build_mirror(source, &hook, None).0
}

/// Build an intercepted view with the passthrough hook
pub fn deep_view(source: &Map) -> ViewNode {
    build_intercepted_view(source, Passthrough)
}

/// Build an intercepted view together with its monitor
///
/// `strategy` defaults to [`MonitorStrategy::flag`]. Fails with
/// [`WatchError::InvalidArgument`] before any traversal if the supplied
/// strategy has no callable.
pub fn build_monitored_view(
    source: &Map,
    strategy: Option<MonitorStrategy>,
) -> Result<(ViewNode, Monitor)> {
    let accounting = strategy.unwrap_or_default().validate()?;
    debug!(
        keys = source.len(),
        initial_value = %accounting.initial_value,
        "building monitored view"
    );

    let base: SharedHook = Arc::new(Passthrough);
    Ok(build_mirror(source, &base, Some(&accounting)))
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_intercepted_view, build_monitored_view, deep_view, AccessPath, AccessStrategy,
        Field, Monitor, MonitorNode, MonitorStrategy, ReadHook, Target, Value, ViewNode,
        WatchConfig, WatchError,
    };
}
