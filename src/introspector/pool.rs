use alloc::{collections::BTreeMap, sync::Arc};
use core::any::TypeId;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::Introspector;
use crate::{
    descriptor::{ClassDescriptor, ParameterDescriptor},
    errors::ResolveErrorKind,
    loader::ClassLoader,
    name::TypeName,
};

type Parameters = Option<Arc<[ParameterDescriptor]>>;

/// Introspector that memoizes what its [`ClassLoader`] describes.
///
/// Each class is loaded at most once. Constructor parameter lists (including the "no constructor" answer)
/// and declared parameter types are cached next to the class descriptors for the lifetime of the pool.
pub struct ReflectionPool<L> {
    loader: L,
    classes: RwLock<BTreeMap<TypeName, Arc<ClassDescriptor>>>,
    constructors: RwLock<BTreeMap<TypeName, Parameters>>,
    typehints: RwLock<BTreeMap<(TypeName, usize), Option<TypeName>>>,
}

impl<L: ClassLoader> ReflectionPool<L> {
    #[inline]
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            classes: RwLock::new(BTreeMap::new()),
            constructors: RwLock::new(BTreeMap::new()),
            typehints: RwLock::new(BTreeMap::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    #[inline]
    #[must_use]
    pub fn is_cached(&self, name: &TypeName) -> bool {
        self.classes.read().contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn cached_classes(&self) -> usize {
        self.classes.read().len()
    }
}

impl<L: ClassLoader> Introspector for ReflectionPool<L> {
    fn describe_class(&self, name: &TypeName) -> Result<Arc<ClassDescriptor>, ResolveErrorKind> {
        if let Some(class) = self.classes.read().get(name) {
            return Ok(class.clone());
        }

        let Some(class) = self.loader.load(name) else {
            let err = ResolveErrorKind::TypeNotFound { name: name.clone() };
            warn!("{}", err);
            return Err(err);
        };
        debug!(class = %name, "Class loaded");

        Ok(self.classes.write().entry(name.clone()).or_insert_with(|| Arc::new(class)).clone())
    }

    fn describe_constructor(&self, name: &TypeName) -> Result<Parameters, ResolveErrorKind> {
        if let Some(parameters) = self.constructors.read().get(name) {
            return Ok(parameters.clone());
        }

        let parameters = self.describe_class(name)?.parameters().cloned();
        self.constructors.write().insert(name.clone(), parameters.clone());

        Ok(parameters)
    }

    fn declared_type(&self, parameter: &ParameterDescriptor) -> Option<TypeName> {
        let key = (parameter.class().clone(), parameter.position());
        if let Some(typehint) = self.typehints.read().get(&key) {
            return typehint.clone();
        }

        let typehint = parameter.declared_type().cloned();
        if let Some(ty) = &typehint {
            if !self.is_cached(ty) {
                if let Some(class) = self.loader.load(ty) {
                    debug!(class = %ty, "Class discovered from parameter type");
                    self.classes.write().entry(ty.clone()).or_insert_with(|| Arc::new(class));
                }
            }
        }
        self.typehints.write().insert(key, typehint.clone());

        typehint
    }

    fn class_of(&self, type_id: TypeId) -> Option<TypeName> {
        let cached = self
            .classes
            .read()
            .values()
            .find(|class| class.type_info().is_some_and(|info| info.id == type_id))
            .map(|class| class.name().clone());

        cached.or_else(|| self.loader.find(type_id))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::{format, string::{String, ToString}};

    use super::ReflectionPool;
    use crate::{
        descriptor::{Class, ClassDescriptor, Param},
        errors::ResolveErrorKind,
        introspector::Introspector as _,
        loader::{Catalog, ClassLoader},
        name::TypeName,
    };

    use alloc::sync::Arc;
    use core::{
        any::TypeId,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use tracing_test::traced_test;

    struct CountingLoader {
        catalog: Catalog,
        loads: AtomicUsize,
    }

    impl ClassLoader for CountingLoader {
        fn load(&self, name: &TypeName) -> Option<ClassDescriptor> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.catalog.load(name)
        }

        fn find(&self, type_id: TypeId) -> Option<TypeName> {
            self.catalog.find(type_id)
        }
    }

    struct Router;
    struct Dispatcher(#[allow(dead_code)] Arc<Router>);

    fn pool() -> ReflectionPool<CountingLoader> {
        ReflectionPool::new(CountingLoader {
            catalog: Catalog::new()
                .class(Class::<Router>::new("Router").construct(|_| Ok(Router)))
                .class(
                    Class::<Dispatcher>::new("Dispatcher")
                        .param(Param::typed("router", "Router"))
                        .param(Param::untyped("debug").default(false))
                        .construct(|args| Ok(Dispatcher(args.instance(0)?))),
                ),
            loads: AtomicUsize::new(0),
        })
    }

    #[test]
    #[traced_test]
    fn test_describe_class_is_cached() {
        let pool = pool();

        let first = pool.describe_class(&"Dispatcher".into()).unwrap();
        let second = pool.describe_class(&"DISPATCHER".into()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pool.loader().loads.load(Ordering::SeqCst), 1);
        assert_eq!(pool.cached_classes(), 1);
    }

    #[test]
    #[traced_test]
    fn test_type_not_found() {
        let pool = pool();

        assert!(matches!(
            pool.describe_class(&"Missing".into()),
            Err(ResolveErrorKind::TypeNotFound { name }) if name == "Missing"
        ));
        assert!(matches!(
            pool.describe_constructor(&"Missing".into()),
            Err(ResolveErrorKind::TypeNotFound { .. })
        ));
        assert!(logs_contain("Missing"));
    }

    #[test]
    #[traced_test]
    fn test_describe_constructor() {
        let pool = pool();

        assert!(pool.describe_constructor(&"Router".into()).unwrap().is_none());
        assert!(pool.describe_constructor(&"Router".into()).unwrap().is_none());

        let params = pool.describe_constructor(&"Dispatcher".into()).unwrap().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name(), "router");
        assert!(params[1].has_default());

        assert_eq!(pool.loader().loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_declared_type_discovers_class() {
        let pool = pool();
        let params = pool.describe_constructor(&"Dispatcher".into()).unwrap().unwrap();

        assert!(!pool.is_cached(&"Router".into()));
        assert_eq!(pool.declared_type(&params[0]).unwrap(), "Router");
        assert!(pool.is_cached(&"Router".into()));
        assert!(pool.declared_type(&params[1]).is_none());

        let loads = pool.loader().loads.load(Ordering::SeqCst);
        let _ = pool.describe_class(&"Router".into()).unwrap();
        let _ = pool.declared_type(&params[0]);
        assert_eq!(pool.loader().loads.load(Ordering::SeqCst), loads);
    }

    #[test]
    #[traced_test]
    fn test_class_of() {
        let pool = pool();

        assert_eq!(pool.class_of(TypeId::of::<Router>()).unwrap(), "Router");
        assert!(pool.class_of(TypeId::of::<u8>()).is_none());
    }
}
