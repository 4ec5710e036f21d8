use std::{fmt, sync::Arc};

use crate::{False, Object};

/// A value stored under a key of a generic object.
///
/// [`Value::False`] is the False Sentinel: the falsy value handed back
/// for every rejected or missing access. It can be sent further messages
/// (see [`Receiver`](crate::Receiver)) and always answers with itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    False,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Boolean conversion.
    pub fn is_true(&self) -> bool {
        match self {
            Value::False => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Str(value) => !value.is_empty(),
            Value::List(values) => !values.is_empty(),
            Value::Object(_) => true,
        }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::False)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Interpret a scalar as a key name. The sentinel, lists and objects
    /// never name a key.
    pub fn as_key(&self) -> Option<Arc<str>> {
        match self {
            Value::Str(value) => Some(value.clone()),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
                Some(Arc::from(self.to_string()))
            }
            Value::False | Value::List(_) | Value::Object(_) => None,
        }
    }
}

impl From<&Value> for bool {
    fn from(value: &Value) -> Self {
        value.is_true()
    }
}

impl From<Value> for bool {
    fn from(value: Value) -> Self {
        value.is_true()
    }
}

impl From<False> for Value {
    fn from(_: False) -> Self {
        Value::False
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<&Object> for Value {
    fn from(object: &Object) -> Self {
        Value::Object(object.clone())
    }
}

/// Objects may (directly or through nesting) contain themselves. Each
/// frame of the formatting recursion pushes a link so a revisit prints a
/// marker instead of recursing forever.
struct VisitedLink<'a> {
    object: &'a Object,
    prev: Option<&'a VisitedLink<'a>>,
}

impl VisitedLink<'_> {
    fn contains(mut link: Option<&Self>, target: &Object) -> bool {
        while let Some(node) = link {
            if node.object.ptr_eq(target) {
                return true;
            }
            link = node.prev;
        }
        false
    }
}

fn fmt_value(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    visited: Option<&VisitedLink<'_>>,
) -> fmt::Result {
    match value {
        Value::False => Ok(()),
        Value::Bool(value) => write!(f, "{value}"),
        Value::Int(value) => write!(f, "{value}"),
        Value::Float(value) => write!(f, "{value}"),
        Value::Str(value) => f.write_str(value),
        Value::List(values) => {
            f.write_str("[")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_value(value, f, visited)?;
            }
            f.write_str("]")
        }
        Value::Object(object) => fmt_object(object, f, visited),
    }
}

fn fmt_object(
    object: &Object,
    f: &mut fmt::Formatter<'_>,
    visited: Option<&VisitedLink<'_>>,
) -> fmt::Result {
    if VisitedLink::contains(visited, object) {
        return write!(f, "{}{{...}}", object.class().name());
    }
    let link = VisitedLink {
        object,
        prev: visited,
    };

    let mut keys = object.keys();
    keys.sort_unstable();

    write!(f, "{}{{", object.class().name())?;
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}=")?;
        fmt_value(&object.get(key), f, Some(&link))?;
    }
    f.write_str("}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_value(self, f, None)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_object(self, f, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, RegistryCreateInfo};

    #[test]
    fn truthiness() {
        assert!(!Value::False.is_true());
        assert!(!Value::from(false).is_true());
        assert!(!Value::from(0).is_true());
        assert!(!Value::from(0.0).is_true());
        assert!(!Value::from("").is_true());
        assert!(!Value::List(Vec::new()).is_true());

        assert!(Value::from(true).is_true());
        assert!(Value::from(-1).is_true());
        assert!(Value::from("0").is_true());
        assert!(bool::from(&Value::from("red")));
    }

    #[test]
    fn sentinel_displays_empty() {
        assert_eq!(Value::False.to_string(), "");
        assert_eq!(Value::from(False).to_string(), "");
    }

    #[test]
    fn keys_from_scalars() {
        assert_eq!(Value::from("color").as_key().as_deref(), Some("color"));
        assert_eq!(Value::from(7).as_key().as_deref(), Some("7"));
        assert_eq!(Value::from(true).as_key().as_deref(), Some("true"));
        assert!(Value::False.as_key().is_none());
        assert!(Value::List(vec![Value::from(1)]).as_key().is_none());
    }

    #[test]
    fn object_display_is_sorted() {
        let registry = Registry::new(RegistryCreateInfo::default());
        let point = registry.define_class("Point");
        let object = point.create([("y", 2), ("x", 1)]);
        assert_eq!(Value::from(&object).to_string(), "Point{x=1, y=2}");
    }

    #[test]
    fn self_reference_display_terminates() {
        let registry = Registry::new(RegistryCreateInfo::default());
        let node = registry.define_class("Node");
        let object = node.create([("name", "a")]);
        object.set("next", &object);
        assert_eq!(
            Value::from(&object).to_string(),
            "Node{name=a, next=Node{...}}"
        );
    }
}
