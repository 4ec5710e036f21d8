use std::{fmt, sync::Arc};

use crate::{AccessKind, Object, Rejected, Value};

pub type Method =
    Arc<dyn Fn(&Object, &[Value]) -> Result<Value, Rejected> + Send + Sync>;

/// A method bound to one key, synthesized on first use of a selector and
/// shared by every instance of the class afterwards.
#[derive(Clone)]
pub struct Accessor {
    key: Arc<str>,
    kind: AccessKind,
    method: Method,
}

impl Accessor {
    pub fn synthesize(kind: AccessKind, key: Arc<str>) -> Self {
        let method = match kind {
            AccessKind::Setter => setter(key.clone()),
            AccessKind::Getter => getter(key.clone()),
            AccessKind::Combined => combined(key.clone()),
        };
        Self { key, kind, method }
    }

    #[inline]
    pub fn key(&self) -> &Arc<str> {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    #[inline]
    pub fn invoke(
        &self,
        object: &Object,
        args: &[Value],
    ) -> Result<Value, Rejected> {
        (self.method)(object, args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.method, &other.method)
    }
}

// only the first argument is used, extra arguments are ignored
fn setter(key: Arc<str>) -> Method {
    Arc::new(move |object: &Object, args: &[Value]| match args.first() {
        Some(value) => Ok(object.set(key.clone(), value.clone())),
        None => Err(Rejected::MissingArgument(format!("set_{key}"))),
    })
}

fn getter(key: Arc<str>) -> Method {
    Arc::new(move |object: &Object, _args: &[Value]| {
        let value = object.get(&key);
        if value.is_sentinel() {
            Err(Rejected::KeyNotFound(key.to_string()))
        } else {
            Ok(value)
        }
    })
}

fn combined(key: Arc<str>) -> Method {
    let set = setter(key.clone());
    let get = getter(key);
    Arc::new(move |object: &Object, args: &[Value]| {
        if args.is_empty() {
            get(object, args)
        } else {
            set(object, args)
        }
    })
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, RegistryCreateInfo};

    fn object() -> Object {
        let registry = Registry::new(RegistryCreateInfo::default());
        registry.define_class("Box").create([("color", "red")])
    }

    #[test]
    fn setter_requires_argument() {
        let object = object();
        let set_color = Accessor::synthesize(AccessKind::Setter, "color".into());
        assert_eq!(
            set_color.invoke(&object, &[]),
            Err(Rejected::MissingArgument("set_color".to_string()))
        );
        assert_eq!(object.get("color"), Value::from("red"));

        let written = set_color.invoke(&object, &[Value::from("blue")]);
        assert_eq!(written, Ok(Value::from("blue")));
        assert_eq!(object.get("color"), Value::from("blue"));
    }

    #[test]
    fn getter_ignores_arguments() {
        let object = object();
        let get_color = Accessor::synthesize(AccessKind::Getter, "color".into());
        let read = get_color.invoke(&object, &[Value::from("blue")]);
        assert_eq!(read, Ok(Value::from("red")));
        assert_eq!(object.get("color"), Value::from("red"));
    }

    #[test]
    fn getter_reports_missing_key() {
        let object = object();
        let get_size = Accessor::synthesize(AccessKind::Getter, "size".into());
        assert_eq!(
            get_size.invoke(&object, &[]),
            Err(Rejected::KeyNotFound("size".to_string()))
        );
    }

    #[test]
    fn combined_reads_and_writes() {
        let object = object();
        let color = Accessor::synthesize(AccessKind::Combined, "color".into());
        assert_eq!(color.invoke(&object, &[]), Ok(Value::from("red")));
        assert_eq!(
            color.invoke(&object, &[Value::from(0)]),
            Ok(Value::from(0))
        );
        assert_eq!(color.invoke(&object, &[]), Ok(Value::from(0)));
        assert!(object.exists("color"));
    }
}
