use alloc::{collections::BTreeMap, sync::Arc};
use core::any::TypeId;

use crate::{descriptor::ClassDescriptor, name::TypeName};

/// Source of class descriptors, the container's way of locating types by name
pub trait ClassLoader: Send + Sync {
    fn load(&self, name: &TypeName) -> Option<ClassDescriptor>;

    /// Name of the class backed by the Rust type with `type_id`
    fn find(&self, type_id: TypeId) -> Option<TypeName>;
}

/// Explicitly registered classes
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    classes: BTreeMap<TypeName, ClassDescriptor>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { classes: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn class(mut self, descriptor: ClassDescriptor) -> Self {
        self.add(descriptor);
        self
    }

    /// Adds a class, returning the one it replaced
    pub fn add(&mut self, descriptor: ClassDescriptor) -> Option<ClassDescriptor> {
        self.classes.insert(descriptor.name().clone(), descriptor)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        self.classes.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassLoader for Catalog {
    fn load(&self, name: &TypeName) -> Option<ClassDescriptor> {
        self.classes.get(name).cloned()
    }

    fn find(&self, type_id: TypeId) -> Option<TypeName> {
        self.classes
            .values()
            .find(|class| class.type_info().is_some_and(|info| info.id == type_id))
            .map(|class| class.name().clone())
    }
}

impl<A: ClassLoader, B: ClassLoader> ClassLoader for (A, B) {
    fn load(&self, name: &TypeName) -> Option<ClassDescriptor> {
        self.0.load(name).or_else(|| self.1.load(name))
    }

    fn find(&self, type_id: TypeId) -> Option<TypeName> {
        self.0.find(type_id).or_else(|| self.1.find(type_id))
    }
}

impl<L: ClassLoader + ?Sized> ClassLoader for Arc<L> {
    #[inline]
    fn load(&self, name: &TypeName) -> Option<ClassDescriptor> {
        (**self).load(name)
    }

    #[inline]
    fn find(&self, type_id: TypeId) -> Option<TypeName> {
        (**self).find(type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, ClassLoader as _};
    use crate::{descriptor::Class, name::TypeName, ClassDescriptor};

    use core::any::TypeId;

    struct Mailer;
    struct Transport;

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new()
            .class(Class::<Mailer>::new("App\\Mailer").construct(|_| Ok(Mailer)))
            .class(ClassDescriptor::interface("App\\Transport"));

        assert_eq!(catalog.len(), 2);
        assert!(catalog.load(&TypeName::new("app\\MAILER")).is_some());
        assert!(catalog.load(&TypeName::new("App\\Missing")).is_none());
        assert_eq!(catalog.find(TypeId::of::<Mailer>()).unwrap(), "App\\Mailer");
        assert!(catalog.find(TypeId::of::<Transport>()).is_none());
    }

    #[test]
    fn test_chained_loaders() {
        let first = Catalog::new().class(ClassDescriptor::interface("Transport"));
        let second = Catalog::new()
            .class(ClassDescriptor::abstract_class("Transport"))
            .class(Class::<Mailer>::new("Mailer").construct(|_| Ok(Mailer)));
        let chain = (first, second);

        assert_eq!(
            chain.load(&TypeName::new("Transport")).unwrap().kind(),
            crate::ClassKind::Interface
        );
        assert!(chain.load(&TypeName::new("Mailer")).is_some());
        assert!(chain.find(TypeId::of::<Mailer>()).is_some());
    }
}
