use std::sync::{Arc, OnceLock};

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;

use crate::{Accessor, Class, InternedId, InternedStrings};

pub type ClassId = InternedId;

static GLOBAL_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// Whether a cached accessor consults the allow-list again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Once synthesized, an accessor is final. Keys declared afterwards do
    /// not affect selectors that were already used.
    #[default]
    Permanent,
    /// Cached accessors skip classification but still check the class
    /// allow-list on every call.
    Revalidate,
}

#[derive(Debug, Clone)]
pub struct RegistryCreateInfo {
    pub cache_policy: CachePolicy,
    pub initial_capacity: usize,
}

/// Process-lifetime class state: names, parents, allow-lists and the
/// synthesized accessor cache.
///
/// Starts empty. Nothing is ever removed; all mutation goes through
/// [`Registry::define_class`], [`Registry::declare_allowed`] and accessor
/// installation.
pub struct Registry {
    info: RegistryCreateInfo,
    classes: InternedStrings,
    names: InternedStrings,
    parents: RwLock<AHashMap<ClassId, ClassId>>,
    allowed: RwLock<AHashMap<ClassId, AHashSet<Arc<str>>>>,
    accessors: RwLock<AHashMap<ClassId, AHashMap<Arc<str>, Accessor>>>,
}

impl Default for RegistryCreateInfo {
    fn default() -> Self {
        Self {
            cache_policy: CachePolicy::Permanent,
            initial_capacity: 16,
        }
    }
}

impl Registry {
    pub fn new(info: RegistryCreateInfo) -> Arc<Self> {
        let capacity = info.initial_capacity;
        Arc::new(Self {
            info,
            classes: InternedStrings::with_capacity(capacity),
            names: InternedStrings::with_capacity(capacity),
            parents: RwLock::new(AHashMap::with_capacity(capacity)),
            allowed: RwLock::new(AHashMap::with_capacity(capacity)),
            accessors: RwLock::new(AHashMap::with_capacity(capacity)),
        })
    }

    /// The registry shared by [`Class::new`]. Created empty on first use
    /// and never torn down.
    pub fn global() -> Arc<Self> {
        GLOBAL_REGISTRY
            .get_or_init(|| Registry::new(RegistryCreateInfo::default()))
            .clone()
    }

    #[inline]
    pub fn cache_policy(&self) -> CachePolicy {
        self.info.cache_policy
    }

    /// Define (or look up) the class called `name`. Classes are identified
    /// by name, so defining the same name twice yields the same class.
    pub fn define_class(self: &Arc<Self>, name: &str) -> Class {
        let interned = self.classes.add(name);
        Class::from_parts(
            interned.id(),
            interned.value().clone(),
            self.clone(),
        )
    }

    /// Define `name` as a subclass of `parent`. Redefining an existing
    /// class replaces its parent.
    pub fn define_subclass(
        self: &Arc<Self>,
        name: &str,
        parent: &Class,
    ) -> Class {
        let class = self.define_class(name);
        if class.id() != parent.id() {
            let previous =
                self.parents.write().insert(class.id(), parent.id());
            if previous.is_some_and(|p| p != parent.id()) {
                log::debug!("class `{name}` reparented to `{}`", parent.name());
            }
        }
        class
    }

    pub fn class_by_id(self: &Arc<Self>, id: ClassId) -> Option<Class> {
        let name = self.classes.get(id)?;
        Some(Class::from_parts(id, name, self.clone()))
    }

    pub fn parent_of(&self, class: ClassId) -> Option<ClassId> {
        self.parents.read().get(&class).copied()
    }

    /// Add `keys` to the allow-list of `class`. Additive; an empty key list
    /// leaves the class untouched (an undeclared class stays open).
    pub fn declare_allowed<I, S>(&self, class: ClassId, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<Arc<str>> = keys
            .into_iter()
            .map(|key| self.names.add(key.as_ref()).value().clone())
            .collect();
        if keys.is_empty() {
            return true;
        }

        let mut allowed = self.allowed.write();
        let entry = allowed.entry(class).or_default();
        entry.extend(keys);
        log::debug!(
            "class `{}` now allows {} keys",
            self.classes.get(class).as_deref().unwrap_or("?"),
            entry.len()
        );
        true
    }

    /// Open by default: a class without a declaration allows every key.
    pub fn is_key_allowed(&self, class: ClassId, key: &str) -> bool {
        match self.allowed.read().get(&class) {
            Some(keys) => keys.contains(key),
            None => true,
        }
    }

    /// The declared keys of `class`, or `None` when it is open.
    pub fn allowed_keys(&self, class: ClassId) -> Option<Vec<Arc<str>>> {
        let allowed = self.allowed.read();
        let mut keys: Vec<Arc<str>> =
            allowed.get(&class)?.iter().cloned().collect();
        keys.sort_unstable();
        Some(keys)
    }

    pub fn cached_accessor(
        &self,
        class: ClassId,
        selector: &str,
    ) -> Option<Accessor> {
        self.accessors.read().get(&class)?.get(selector).cloned()
    }

    /// Install `accessor` for `selector` unless another thread got there
    /// first, and return whichever accessor is now cached.
    pub fn install_accessor(
        &self,
        class: ClassId,
        selector: &str,
        accessor: Accessor,
    ) -> Accessor {
        let selector = self.names.add(selector).value().clone();
        let mut accessors = self.accessors.write();
        accessors
            .entry(class)
            .or_default()
            .entry(selector)
            .or_insert(accessor)
            .clone()
    }

    pub fn accessor_count(&self, class: ClassId) -> usize {
        self.accessors.read().get(&class).map_or(0, |cache| cache.len())
    }

    pub fn cached_selectors(&self, class: ClassId) -> Vec<Arc<str>> {
        let accessors = self.accessors.read();
        let mut selectors: Vec<Arc<str>> = accessors
            .get(&class)
            .map(|cache| cache.keys().cloned().collect())
            .unwrap_or_default();
        selectors.sort_unstable();
        selectors
    }

    /// Intern a key name so accessors share one allocation per key.
    pub fn intern(&self, name: &str) -> Arc<str> {
        self.names.add(name).value().clone()
    }
}
