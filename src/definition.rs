use alloc::{format, string::String, vec::Vec};
use core::mem;

use crate::{errors::DefinitionErrorKind, value::Value};

/// Prefix marking a definition key as a raw value for the parameter named after it
pub const RAW_PREFIX: char = ':';

/// Ordered per-class mapping of constructor parameters to how they should be provided.
///
/// A bare key (`logger`) names the type the container should build for the parameter.
/// A key prefixed with [`RAW_PREFIX`] (`:message`) carries a literal passed to the constructor as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definition {
    entries: Vec<(String, Value)>,
}

impl Definition {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Adds an entry with an explicit key, bare or raw
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Resolves `param` by building the type `ty`
    #[must_use]
    pub fn class(self, param: &str, ty: impl Into<String>) -> Self {
        self.with(param, Value::Str(ty.into()))
    }

    /// Passes `value` to `param` without resolution
    #[must_use]
    pub fn raw(self, param: &str, value: impl Into<Value>) -> Self {
        self.with(format!("{RAW_PREFIX}{param}"), value)
    }

    /// Inserts an entry, keeping the position of a replaced key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => Some(mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    /// Bare entry for the parameter
    #[inline]
    #[must_use]
    pub fn class_for(&self, param: &str) -> Option<&Value> {
        self.get(param)
    }

    /// Raw entry for the parameter
    #[must_use]
    pub fn raw_for(&self, param: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key.strip_prefix(RAW_PREFIX) == Some(param))
            .map(|(_, value)| value)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Checks that every bare key names a type
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::InvalidDefinition`] for the first bare key holding a non-string value
    pub fn validate(&self) -> Result<(), DefinitionErrorKind> {
        for (key, value) in &self.entries {
            if !key.starts_with(RAW_PREFIX) && value.as_str().is_none() {
                return Err(DefinitionErrorKind::InvalidDefinition { param: key.clone() });
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Definition {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut definition = Self::new();
        for (key, value) in iter {
            definition.insert(key, value);
        }
        definition
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Definition {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl TryFrom<&Value> for Definition {
    type Error = DefinitionErrorKind;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Map(entries) => Ok(entries.iter().map(|(key, value)| (key.clone(), value.clone())).collect()),
            value => Err(DefinitionErrorKind::InvalidArgument {
                operation: "define",
                expected: "a map of parameter names to values",
                actual: value.kind(),
            }),
        }
    }
}
