use std::{fmt, sync::Arc};

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::{
    Accessor, CachePolicy, Class, FALSE, Receiver, Rejected, Reserved,
    Selector, Value,
};

struct ObjectInner {
    class: Class,
    slots: RwLock<AHashMap<Arc<str>, Value>>,
}

/// A generic object: an open key/value bag owned by one class.
///
/// `Object` is a shared handle; cloning it aliases the same instance, which
/// is what nested values and chained sends rely on.
///
/// [`get`](Object::get) and [`set`](Object::set) are the only paths into
/// the slot storage. Every accessor, including the synthesized ones,
/// routes through them.
#[derive(Clone)]
pub struct Object(Arc<ObjectInner>);

impl Object {
    pub fn empty(class: &Class) -> Self {
        Self(Arc::new(ObjectInner {
            class: class.clone(),
            slots: RwLock::new(AHashMap::new()),
        }))
    }

    pub fn new<I, K, V>(class: &Class, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arc<str>>,
        V: Into<Value>,
    {
        let object = Self::empty(class);
        object.args(pairs);
        object
    }

    /// The dynamic (most-derived) class of this instance.
    #[inline]
    pub fn class(&self) -> &Class {
        &self.0.class
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The stored value, or the False Sentinel when `key` was never set.
    pub fn get(&self, key: &str) -> Value {
        self.0.slots.read().get(key).cloned().unwrap_or(FALSE)
    }

    /// Store `value` under `key` and return it. No allow-list check at
    /// this level.
    pub fn set<K, V>(&self, key: K, value: V) -> Value
    where
        K: Into<Arc<str>>,
        V: Into<Value>,
    {
        let value = value.into();
        self.0.slots.write().insert(key.into(), value.clone());
        value
    }

    pub fn exists(&self, key: &str) -> bool {
        self.0.slots.read().contains_key(key)
    }

    /// Keys currently set, in no particular order.
    pub fn keys(&self) -> Vec<Arc<str>> {
        self.0.slots.read().keys().cloned().collect()
    }

    /// Unset `key`, returning the removed value or the False Sentinel.
    pub fn remove(&self, key: &str) -> Value {
        self.0.slots.write().remove(key).unwrap_or(FALSE)
    }

    pub fn args<I, K, V>(&self, pairs: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arc<str>>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.set(key, value);
        }
        self
    }

    /// Load alternating keys and values. A trailing key without a value is
    /// stored with the False Sentinel; pairs whose key is not a scalar are
    /// skipped.
    pub fn args_flat(&self, args: &[Value]) -> &Self {
        for pair in args.chunks(2) {
            let Some(key) = pair[0].as_key() else {
                log::trace!("skipping non-scalar key {:?}", pair[0]);
                continue;
            };
            let value = pair.get(1).cloned().unwrap_or(FALSE);
            self.set(key, value);
        }
        self
    }

    /// Declaring keys is a class-level operation. On an instance it has no
    /// effect and reports failure.
    pub fn declare_allowed<I, S>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let count = keys.into_iter().count();
        log::warn!(
            "declare_allowed ({count} keys) called on an instance of `{}`; \
             declare on the class instead",
            self.class().name()
        );
        false
    }

    pub fn is_key_allowed(&self, key: &str) -> bool {
        self.class().is_key_allowed(key)
    }

    /// Resolve `selector` and report why it was rejected, if it was.
    ///
    /// Order: explicit operations, then the class accessor cache, then
    /// classification, allow-list check and synthesis. The synthesized
    /// accessor is cached before it is invoked, so the first call behaves
    /// exactly like every later one.
    pub fn try_send(
        &self,
        selector: &str,
        args: &[Value],
    ) -> Result<Value, Rejected> {
        if let Some(reserved) = Reserved::from_name(selector)
            .filter(|reserved| reserved.applies_to_instances())
        {
            return self.send_reserved(selector, reserved, args);
        }

        let class = self.class();
        let registry = class.registry();

        if let Some(accessor) = registry.cached_accessor(class.id(), selector) {
            if registry.cache_policy() == CachePolicy::Revalidate
                && !class.is_key_allowed(accessor.key())
            {
                return Err(self.not_allowed(accessor.key()));
            }
            log::trace!("cache hit for `{}::{selector}`", class.name());
            return accessor.invoke(self, args);
        }

        let parsed = Selector::parse(selector)
            .ok_or_else(|| Rejected::InvalidSelector(selector.to_string()))?;
        if !class.is_key_allowed(parsed.key) {
            return Err(self.not_allowed(parsed.key));
        }

        let accessor = Accessor::synthesize(parsed.kind, registry.intern(parsed.key));
        let accessor = registry.install_accessor(class.id(), selector, accessor);
        log::debug!(
            "synthesized {:?} accessor `{}::{selector}` for key `{}`",
            accessor.kind(),
            class.name(),
            accessor.key()
        );
        accessor.invoke(self, args)
    }

    fn send_reserved(
        &self,
        selector: &str,
        reserved: Reserved,
        args: &[Value],
    ) -> Result<Value, Rejected> {
        let key = || {
            args.first()
                .and_then(Value::as_key)
                .ok_or_else(|| Rejected::NotAScalarKey(selector.to_string()))
        };

        match reserved {
            Reserved::Get => Ok(self.get(&key()?)),
            Reserved::Set => {
                let key = key()?;
                let value = args.get(1).cloned().ok_or_else(|| {
                    Rejected::MissingArgument(selector.to_string())
                })?;
                Ok(self.set(key, value))
            }
            Reserved::Exists => Ok(Value::Bool(self.exists(&key()?))),
            Reserved::Keys => {
                Ok(Value::List(self.keys().into_iter().map(Value::Str).collect()))
            }
            Reserved::Args => Ok(Value::Object(self.args_flat(args).clone())),
            Reserved::IsKeyAllowed => {
                Ok(Value::Bool(self.is_key_allowed(&key()?)))
            }
            Reserved::DeclareAllowed => {
                let keys = args.iter().filter_map(Value::as_key);
                Ok(Value::Bool(self.declare_allowed(keys)))
            }
            Reserved::New => Err(Rejected::InvalidSelector(selector.to_string())),
        }
    }

    fn not_allowed(&self, key: &str) -> Rejected {
        Rejected::KeyNotAllowed {
            class: Arc::from(self.class().name()),
            key: key.to_string(),
        }
    }
}

impl Receiver for Object {
    fn send(&self, selector: &str, args: &[Value]) -> Value {
        self.try_send(selector, args).unwrap_or_else(|rejected| {
            log::trace!("rejected: {rejected}");
            FALSE
        })
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.keys();
        keys.sort_unstable();
        f.debug_struct("Object")
            .field("class", &self.class().name())
            .field("keys", &keys)
            .finish()
    }
}
