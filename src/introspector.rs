mod fixed;
mod pool;

pub use fixed::FixedIntrospector;
pub use pool::ReflectionPool;

use alloc::{collections::BTreeSet, sync::Arc, vec::Vec};
use core::any::TypeId;

use crate::{
    descriptor::{ClassDescriptor, ParameterDescriptor},
    errors::ResolveErrorKind,
    name::TypeName,
};

/// Constructor shape of classes, looked up by name.
///
/// Implementations hold no policy: they only describe types,
/// resolution decisions belong to the [`crate::Container`].
pub trait Introspector: Send + Sync {
    /// # Errors
    /// Returns [`ResolveErrorKind::TypeNotFound`] if the type can't be located
    fn describe_class(&self, name: &TypeName) -> Result<Arc<ClassDescriptor>, ResolveErrorKind>;

    /// Constructor parameters, `None` if the type declares no constructor
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::TypeNotFound`] if the type can't be located
    fn describe_constructor(&self, name: &TypeName) -> Result<Option<Arc<[ParameterDescriptor]>>, ResolveErrorKind>;

    /// Declared class, abstract or interface type of the parameter, `None` for untyped parameters
    fn declared_type(&self, parameter: &ParameterDescriptor) -> Option<TypeName>;

    /// Name of the class backed by the Rust type with `type_id`
    fn class_of(&self, type_id: TypeId) -> Option<TypeName>;

    /// # Errors
    /// Returns [`ResolveErrorKind::TypeNotFound`] if the type can't be located
    fn is_instantiable(&self, name: &TypeName) -> Result<bool, ResolveErrorKind> {
        Ok(self.describe_class(name)?.is_instantiable())
    }

    /// Whether `class` extends or implements `ancestor`, directly or through its supertypes.
    /// A class isn't a subclass of itself.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::TypeNotFound`] if `class` can't be located.
    /// Supertypes that can't be located are only compared by name.
    fn is_subclass_of(&self, class: &TypeName, ancestor: &TypeName) -> Result<bool, ResolveErrorKind> {
        let mut pending: Vec<Arc<ClassDescriptor>> = Vec::from([self.describe_class(class)?]);
        let mut visited = BTreeSet::new();

        while let Some(descriptor) = pending.pop() {
            for supertype in descriptor.supertypes() {
                if supertype == ancestor {
                    return Ok(true);
                }
                if visited.insert(supertype.clone()) {
                    if let Ok(parent) = self.describe_class(supertype) {
                        pending.push(parent);
                    }
                }
            }
        }

        Ok(false)
    }
}

impl<I: Introspector + ?Sized> Introspector for Arc<I> {
    #[inline]
    fn describe_class(&self, name: &TypeName) -> Result<Arc<ClassDescriptor>, ResolveErrorKind> {
        (**self).describe_class(name)
    }

    #[inline]
    fn describe_constructor(&self, name: &TypeName) -> Result<Option<Arc<[ParameterDescriptor]>>, ResolveErrorKind> {
        (**self).describe_constructor(name)
    }

    #[inline]
    fn declared_type(&self, parameter: &ParameterDescriptor) -> Option<TypeName> {
        (**self).declared_type(parameter)
    }

    #[inline]
    fn class_of(&self, type_id: TypeId) -> Option<TypeName> {
        (**self).class_of(type_id)
    }

    #[inline]
    fn is_instantiable(&self, name: &TypeName) -> Result<bool, ResolveErrorKind> {
        (**self).is_instantiable(name)
    }

    #[inline]
    fn is_subclass_of(&self, class: &TypeName, ancestor: &TypeName) -> Result<bool, ResolveErrorKind> {
        (**self).is_subclass_of(class, ancestor)
    }
}
