//! Classes registered at link time.
//!
//! ```ignore
//! use autowire::{autoload::{distributed_slice, CLASSES}, Class, ClassDescriptor};
//!
//! struct Clock;
//!
//! #[distributed_slice(CLASSES)]
//! fn clock() -> ClassDescriptor {
//!     Class::<Clock>::new("Clock").construct(|_| Ok(Clock))
//! }
//! ```

use core::any::TypeId;

use crate::{descriptor::ClassDescriptor, loader::{Catalog, ClassLoader}, name::TypeName};

pub use linkme::{self, distributed_slice};

#[distributed_slice]
pub static CLASSES: [fn() -> ClassDescriptor];

/// Loader over the [`CLASSES`] slice.
///
/// Descriptors are built on every lookup, wrap it into a [`crate::ReflectionPool`] to build each one once.
#[derive(Debug, Default, Clone, Copy)]
pub struct Autoload;

impl Autoload {
    /// Snapshots every registered class into a [`Catalog`]
    #[must_use]
    pub fn catalog(self) -> Catalog {
        CLASSES.iter().fold(Catalog::new(), |catalog, getter| catalog.class(getter()))
    }
}

impl ClassLoader for Autoload {
    fn load(&self, name: &TypeName) -> Option<ClassDescriptor> {
        CLASSES.iter().map(|getter| getter()).find(|class| class.name() == name)
    }

    fn find(&self, type_id: TypeId) -> Option<TypeName> {
        CLASSES
            .iter()
            .map(|getter| getter())
            .find(|class| class.type_info().is_some_and(|info| info.id == type_id))
            .map(|class| class.name().clone())
    }
}
