use alloc::collections::BTreeMap;
use tracing::debug;

use crate::{name::TypeName, value::Instance};

/// Shared instance slots.
///
/// A present key with `None` marks a class as shared but not built yet,
/// an absent key means the class isn't shared at all.
#[derive(Default)]
pub(crate) struct SharedCache {
    slots: BTreeMap<TypeName, Option<Instance>>,
}

impl SharedCache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { slots: BTreeMap::new() }
    }

    /// Marks the class as shared, dropping any instance built before
    pub(crate) fn mark(&mut self, name: TypeName) {
        self.slots.insert(name, None);
    }

    pub(crate) fn insert(&mut self, name: TypeName, instance: Instance) -> Option<Instance> {
        self.slots.insert(name, Some(instance)).flatten()
    }

    #[must_use]
    pub(crate) fn get(&self, name: &TypeName) -> Option<Instance> {
        self.slots.get(name).and_then(Clone::clone)
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, name: &TypeName) -> bool {
        self.slots.contains_key(name)
    }

    /// Resets a populated slot to pending
    pub(crate) fn refresh(&mut self, name: &TypeName) -> bool {
        match self.slots.get_mut(name) {
            Some(slot @ Some(_)) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remove(&mut self, name: &TypeName) -> bool {
        self.slots.remove(name).is_some()
    }

    /// Fills the slot of a shared class with a freshly built instance.
    ///
    /// If the slot was populated concurrently, the earlier instance wins and is returned instead,
    /// so every caller observes the same shared instance.
    pub(crate) fn fill(&mut self, name: &TypeName, instance: Instance) -> Instance {
        match self.slots.get_mut(name) {
            Some(Some(existing)) => {
                debug!("Shared slot already populated");
                existing.clone()
            }
            Some(slot @ None) => {
                *slot = Some(instance.clone());
                debug!("Stored in shared slot");
                instance
            }
            None => instance,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::{format, string::{String, ToString}};

    use super::SharedCache;
    use crate::{
        descriptor::Class,
        name::TypeName,
        value::Instance,
    };

    use alloc::sync::Arc;
    use tracing_test::traced_test;

    struct Config;

    fn instance() -> Instance {
        let class = Arc::new(Class::<Config>::new("Config").construct(|_| Ok(Config)));
        class.instantiate(&crate::args::Args::default()).unwrap().unwrap()
    }

    #[test]
    #[traced_test]
    fn test_pending_and_populated() {
        let name = TypeName::new("Config");
        let mut cache = SharedCache::new();

        assert!(!cache.contains(&name));
        assert!(!cache.refresh(&name));

        cache.mark(name.clone());
        assert!(cache.contains(&name));
        assert!(cache.get(&name).is_none());
        assert!(!cache.refresh(&name));

        let first = cache.fill(&name, instance());
        assert!(Instance::ptr_eq(&first, &cache.get(&name).unwrap()));

        let second = cache.fill(&name, instance());
        assert!(Instance::ptr_eq(&first, &second));

        assert!(cache.refresh(&name));
        assert!(cache.contains(&name));
        assert!(cache.get(&name).is_none());

        assert!(cache.remove(&TypeName::new("CONFIG")));
        assert!(!cache.contains(&name));
    }

    #[test]
    fn test_fill_unshared_is_passthrough() {
        let name = TypeName::new("Config");
        let mut cache = SharedCache::new();

        let built = instance();
        let returned = cache.fill(&name, built.clone());

        assert!(Instance::ptr_eq(&built, &returned));
        assert!(!cache.contains(&name));
    }

    #[test]
    fn test_insert_populates() {
        let name = TypeName::new("Config");
        let mut cache = SharedCache::new();

        assert!(cache.insert(name.clone(), instance()).is_none());
        assert!(cache.get(&name).is_some());
    }
}
