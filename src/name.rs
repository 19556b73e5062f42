use alloc::{string::String, sync::Arc};
use core::{
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

/// Case-insensitive name of a class, interface or abstract type.
///
/// The spelling the name was created with is kept for messages,
/// while equality, ordering and hashing use the ASCII lowercase form.
#[derive(Clone)]
pub struct TypeName {
    name: Arc<str>,
    key: Arc<str>,
}

impl TypeName {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            key: Arc::from(name.to_ascii_lowercase()),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Normalized form used as a table key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for TypeName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeName {}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.key.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.key.eq_ignore_ascii_case(other)
    }
}

impl PartialOrd for TypeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for TypeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Debug for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.name, f)
    }
}

impl From<&str> for TypeName {
    #[inline]
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    #[inline]
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<&String> for TypeName {
    #[inline]
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&TypeName> for TypeName {
    #[inline]
    fn from(name: &TypeName) -> Self {
        name.clone()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::TypeName;

    use alloc::{collections::BTreeMap, format};

    #[test]
    fn test_case_insensitive_identity() {
        let upper = TypeName::new("Foo\\BarService");
        let lower = TypeName::new("foo\\barservice");

        assert_eq!(upper, lower);
        assert_eq!(upper, "FOO\\BARSERVICE");
        assert_eq!(upper.as_str(), "Foo\\BarService");
        assert_eq!(upper.key(), "foo\\barservice");
        assert_eq!(format!("{upper}"), "Foo\\BarService");

        let mut table = BTreeMap::new();
        table.insert(upper, 1);
        table.insert(lower, 2);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&TypeName::new("FOO\\barService")), Some(&2));
    }
}
