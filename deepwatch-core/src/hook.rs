//! Read hooks
//!
//! A read hook is bound to every level of an intercepted view and decides
//! what a property read yields. Hooks receive the raw level and the key
//! being read; the stored field is normally returned as-is, but a hook is
//! free to compute something else.

use crate::view::{Field, Target};
use deepwatch_types::Value;
use std::fmt;
use std::sync::Arc;

/// Hook invoked once per property read on a [`ViewNode`](crate::ViewNode)
pub trait ReadHook: Send + Sync {
    /// Produce the field to yield for `key`
    fn read(&self, target: &Target, key: &str) -> Field;
}

impl<F> ReadHook for F
where
    F: Fn(&Target, &str) -> Field + Send + Sync,
{
    fn read(&self, target: &Target, key: &str) -> Field {
        self(target, key)
    }
}

/// Shared, type-erased hook as stored on views
pub type SharedHook = Arc<dyn ReadHook>;

/// Returns the stored field unmodified
///
/// Reading a key that is not present yields `Value::Undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl ReadHook for Passthrough {
    fn read(&self, target: &Target, key: &str) -> Field {
        target
            .get(key)
            .cloned()
            .unwrap_or(Field::Value(Value::Undefined))
    }
}

pub(crate) struct HookDebug<'a>(pub &'a SharedHook);

impl fmt::Debug for HookDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<hook@{:p}>", Arc::as_ptr(self.0) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        let mut target = Target::default();
        target.insert("foo", Field::Value(Value::from("foo")));
        target
    }

    #[test]
    fn test_passthrough_returns_stored_field() {
        let field = Passthrough.read(&target(), "foo");
        assert_eq!(field, Value::from("foo"));
    }

    #[test]
    fn test_passthrough_missing_key_is_undefined() {
        let field = Passthrough.read(&target(), "nope");
        assert_eq!(field, Value::Undefined);
    }

    #[test]
    fn test_closure_hook() {
        let hook = |target: &Target, key: &str| match target.get(key) {
            Some(Field::Value(Value::String(s))) => Field::Value(Value::from(s.to_uppercase())),
            _ => Field::Value(Value::Null),
        };

        assert_eq!(hook.read(&target(), "foo"), Value::from("FOO"));
        assert_eq!(hook.read(&target(), "bar"), Value::Null);
    }
}
