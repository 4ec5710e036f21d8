use crate::{False, Value};

/// Anything a message can be sent to.
///
/// `send` is the single hook invoked for every dynamic method name. On an
/// instance it resolves explicit operations first, then cached accessors,
/// and finally synthesizes a new accessor. Classes only understand their
/// class-level operations, and everything else answers the False Sentinel.
pub trait Receiver {
    fn send(&self, selector: &str, args: &[Value]) -> Value;

    /// Send `selector` with no arguments.
    #[inline]
    fn read(&self, selector: &str) -> Value {
        self.send(selector, &[])
    }

    /// Send `selector` with a single argument.
    #[inline]
    fn write<V: Into<Value>>(&self, selector: &str, value: V) -> Value
    where
        Self: Sized,
    {
        self.send(selector, &[value.into()])
    }
}

impl Receiver for Value {
    fn send(&self, selector: &str, args: &[Value]) -> Value {
        match self {
            Value::Object(object) => object.send(selector, args),
            Value::False => False.send(selector, args),
            _ => {
                log::trace!("`{selector}` sent to non-instance {self:?}");
                Value::False
            }
        }
    }
}
