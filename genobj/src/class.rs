use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use ahash::AHashSet;

use crate::{
    ClassId, FALSE, Object, Receiver, Registry, Rejected, Reserved, Value,
};

/// A class identifier bound to the registry that owns its allow-list and
/// accessor cache. Cheap to clone.
#[derive(Clone)]
pub struct Class {
    id: ClassId,
    name: Arc<str>,
    registry: Arc<Registry>,
}

impl Class {
    /// Define `name` in the process-wide registry.
    pub fn new(name: &str) -> Self {
        Registry::global().define_class(name)
    }

    pub(crate) fn from_parts(
        id: ClassId,
        name: Arc<str>,
        registry: Arc<Registry>,
    ) -> Self {
        Self { id, name, registry }
    }

    /// Define a class deriving from this one. The subclass starts open and
    /// has its own accessor cache regardless of what this class declared.
    pub fn subclass(&self, name: &str) -> Class {
        self.registry.define_subclass(name, self)
    }

    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn parent(&self) -> Option<Class> {
        let parent = self.registry.parent_of(self.id)?;
        self.registry.class_by_id(parent)
    }

    /// `true` if `other` is this class or one of its ancestors.
    pub fn is_a(&self, other: &Class) -> bool {
        if !Arc::ptr_eq(&self.registry, &other.registry) {
            return false;
        }
        let mut visited = AHashSet::new();
        let mut current = Some(self.id);
        while let Some(id) = current {
            if id == other.id {
                return true;
            }
            if !visited.insert(id) {
                break;
            }
            current = self.registry.parent_of(id);
        }
        false
    }

    /// Add `keys` to this class's allow-list. Always succeeds on a class.
    pub fn declare_allowed<I, S>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.declare_allowed(self.id, keys)
    }

    pub fn is_key_allowed(&self, key: &str) -> bool {
        self.registry.is_key_allowed(self.id, key)
    }

    pub fn allowed_keys(&self) -> Option<Vec<Arc<str>>> {
        self.registry.allowed_keys(self.id)
    }

    /// Construct an instance and load `pairs` into it.
    pub fn create<I, K, V>(&self, pairs: I) -> Object
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arc<str>>,
        V: Into<Value>,
    {
        Object::new(self, pairs)
    }

    /// Construct an instance from alternating keys and values.
    pub fn create_flat(&self, args: &[Value]) -> Object {
        let object = Object::empty(self);
        object.args_flat(args);
        object
    }

    pub fn accessor_count(&self) -> usize {
        self.registry.accessor_count(self.id)
    }

    pub fn cached_selectors(&self) -> Vec<Arc<str>> {
        self.registry.cached_selectors(self.id)
    }
}

impl Receiver for Class {
    fn send(&self, selector: &str, args: &[Value]) -> Value {
        match Reserved::from_name(selector) {
            Some(Reserved::New) => Value::Object(self.create_flat(args)),
            Some(Reserved::DeclareAllowed) => {
                let keys: Vec<Arc<str>> =
                    args.iter().filter_map(Value::as_key).collect();
                Value::Bool(self.declare_allowed(keys))
            }
            Some(Reserved::IsKeyAllowed) => {
                let allowed = args
                    .first()
                    .and_then(Value::as_key)
                    .is_some_and(|key| self.is_key_allowed(&key));
                Value::Bool(allowed)
            }
            _ => {
                let rejected = Rejected::NotAnInstance {
                    class: self.name.clone(),
                    selector: selector.to_string(),
                };
                log::trace!("rejected: {rejected}");
                FALSE
            }
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.registry, &other.registry)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
