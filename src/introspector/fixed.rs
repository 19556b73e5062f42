use alloc::{collections::BTreeMap, sync::Arc};
use core::any::TypeId;

use super::Introspector;
use crate::{
    descriptor::{ClassDescriptor, ParameterDescriptor},
    errors::ResolveErrorKind,
    name::TypeName,
};

/// Introspector over a fixed table of classes, without a loader or caching.
///
/// Meant for tests that want to spell out the whole type universe.
#[derive(Debug, Default, Clone)]
pub struct FixedIntrospector {
    classes: BTreeMap<TypeName, Arc<ClassDescriptor>>,
}

impl FixedIntrospector {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { classes: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn class(mut self, descriptor: ClassDescriptor) -> Self {
        self.classes.insert(descriptor.name().clone(), Arc::new(descriptor));
        self
    }
}

impl FromIterator<ClassDescriptor> for FixedIntrospector {
    fn from_iter<I: IntoIterator<Item = ClassDescriptor>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::class)
    }
}

impl Introspector for FixedIntrospector {
    fn describe_class(&self, name: &TypeName) -> Result<Arc<ClassDescriptor>, ResolveErrorKind> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveErrorKind::TypeNotFound { name: name.clone() })
    }

    fn describe_constructor(&self, name: &TypeName) -> Result<Option<Arc<[ParameterDescriptor]>>, ResolveErrorKind> {
        Ok(self.describe_class(name)?.parameters().cloned())
    }

    fn declared_type(&self, parameter: &ParameterDescriptor) -> Option<TypeName> {
        parameter.declared_type().cloned()
    }

    fn class_of(&self, type_id: TypeId) -> Option<TypeName> {
        self.classes
            .values()
            .find(|class| class.type_info().is_some_and(|info| info.id == type_id))
            .map(|class| class.name().clone())
    }
}
