use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedId(u32);

/// A name stored once per registry. Class names, allowed keys and
/// accessor keys all share their allocation through this table.
#[derive(Debug, Clone)]
pub struct InternedString {
    id: InternedId,
    value: Arc<str>,
}

struct InternedStringsImpl {
    table: Vec<Arc<str>>,
    mappings: AHashMap<Arc<str>, InternedId>,
}

pub struct InternedStrings(RwLock<InternedStringsImpl>);

impl InternedId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl InternedString {
    #[inline]
    pub fn id(&self) -> InternedId {
        self.id
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn value(&self) -> &Arc<str> {
        &self.value
    }
}

impl InternedStringsImpl {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Vec::with_capacity(capacity),
            mappings: AHashMap::with_capacity(capacity),
        }
    }

    fn lookup(&self, value: &str) -> Option<InternedString> {
        let &id = self.mappings.get(value)?;
        Some(InternedString {
            id,
            value: self.table[id.index()].clone(),
        })
    }

    fn get_or_add(&mut self, value: &str) -> InternedString {
        if let Some(interned) = self.lookup(value) {
            return interned;
        }
        let id = InternedId(self.table.len() as u32);
        let interned = Arc::<str>::from(value);
        self.table.push(interned.clone());
        self.mappings.insert(interned.clone(), id);
        InternedString {
            id,
            value: interned,
        }
    }

    fn get(&self, id: InternedId) -> Option<Arc<str>> {
        self.table.get(id.index()).cloned()
    }
}

impl InternedStrings {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(RwLock::new(InternedStringsImpl::with_capacity(capacity)))
    }

    pub fn add(&self, value: &str) -> InternedString {
        // most names are already known after warmup
        if let Some(interned) = self.0.read().lookup(value) {
            return interned;
        }
        self.0.write().get_or_add(value)
    }

    pub fn lookup(&self, value: &str) -> Option<InternedString> {
        self.0.read().lookup(value)
    }

    pub fn get(&self, id: InternedId) -> Option<Arc<str>> {
        self.0.read().get(id)
    }

    pub fn len(&self) -> usize {
        self.0.read().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InternedStrings {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
