use std::fmt;

use crate::{Receiver, Value};

/// The canonical False Sentinel as a [`Value`].
pub const FALSE: Value = Value::False;

/// The False Sentinel as its own receiver type.
///
/// Stateless and immutable: every copy is the same value. Any message sent
/// to it answers [`FALSE`], so a chain such as `a.b.c.d` degrades to the
/// sentinel at the first missing link instead of failing there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct False;

impl False {
    #[inline]
    pub const fn value(self) -> Value {
        FALSE
    }
}

impl Receiver for False {
    #[inline]
    fn send(&self, selector: &str, _args: &[Value]) -> Value {
        log::trace!("`{selector}` sent to the false sentinel");
        FALSE
    }
}

impl From<False> for bool {
    fn from(_: False) -> Self {
        false
    }
}

impl fmt::Display for False {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl PartialEq<Value> for False {
    fn eq(&self, other: &Value) -> bool {
        other.is_sentinel()
    }
}

impl PartialEq<False> for Value {
    fn eq(&self, _other: &False) -> bool {
        self.is_sentinel()
    }
}
