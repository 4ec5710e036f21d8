/// Which access pattern a synthesized accessor implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// `set_<key>(value)`
    Setter,
    /// `get_<key>()`
    Getter,
    /// `<key>()` reads, `<key>(value)` writes.
    Combined,
}

/// A method name classified into an access pattern and the key it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    pub name: &'a str,
    pub kind: AccessKind,
    pub key: &'a str,
}

/// Selectors bound to explicit operations. These never reach accessor
/// synthesis, so a key that shares one of these names is only reachable
/// through `get`/`set` or the prefixed accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reserved {
    Get,
    Set,
    Exists,
    Keys,
    Args,
    IsKeyAllowed,
    DeclareAllowed,
    /// class-level only
    New,
}

const SETTER_PREFIX: &str = "set_";
const GETTER_PREFIX: &str = "get_";

/// Method names are plain identifiers: `[A-Za-z0-9_]+`.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl<'a> Selector<'a> {
    /// Classify `name`. Returns `None` for names that are not identifiers.
    pub fn parse(name: &'a str) -> Option<Self> {
        if !is_identifier(name) {
            return None;
        }

        let (kind, key) = if let Some(key) =
            name.strip_prefix(SETTER_PREFIX).filter(|k| !k.is_empty())
        {
            (AccessKind::Setter, key)
        } else if let Some(key) =
            name.strip_prefix(GETTER_PREFIX).filter(|k| !k.is_empty())
        {
            (AccessKind::Getter, key)
        } else {
            (AccessKind::Combined, name)
        };

        Some(Self { name, kind, key })
    }
}

impl Reserved {
    pub fn from_name(name: &str) -> Option<Self> {
        let reserved = match name {
            "get" => Self::Get,
            "set" => Self::Set,
            "exists" => Self::Exists,
            "keys" => Self::Keys,
            "args" => Self::Args,
            "is_key_allowed" => Self::IsKeyAllowed,
            "declare_allowed" => Self::DeclareAllowed,
            "new" => Self::New,
            _ => return None,
        };
        Some(reserved)
    }

    #[inline]
    pub fn applies_to_instances(self) -> bool {
        !matches!(self, Self::New)
    }
}
