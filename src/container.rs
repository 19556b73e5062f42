use alloc::{borrow::Cow, boxed::Box, collections::BTreeMap, string::ToString as _, sync::Arc, vec::Vec};
use core::any::{type_name, Any, TypeId};
use parking_lot::RwLock;
use tracing::{debug, error, info_span, warn};

use crate::{
    args::Args,
    cache::SharedCache,
    config::Config,
    definition::Definition,
    descriptor::{ClassDescriptor, ParameterDescriptor},
    errors::{DefinitionErrorKind, ResolveErrorKind},
    introspector::Introspector,
    name::TypeName,
    value::{Instance, Value},
};

/// Something [`Container::share`] accepts: a class to build once, or an instance to reuse as is
#[derive(Debug, Clone)]
pub enum Shareable {
    Type(TypeName),
    Instance(Instance),
}

impl From<&str> for Shareable {
    fn from(name: &str) -> Self {
        Shareable::Type(name.into())
    }
}

impl From<alloc::string::String> for Shareable {
    fn from(name: alloc::string::String) -> Self {
        Shareable::Type(name.into())
    }
}

impl From<TypeName> for Shareable {
    fn from(name: TypeName) -> Self {
        Shareable::Type(name)
    }
}

impl From<&TypeName> for Shareable {
    fn from(name: &TypeName) -> Self {
        Shareable::Type(name.clone())
    }
}

impl From<Instance> for Shareable {
    fn from(instance: Instance) -> Self {
        Shareable::Instance(instance)
    }
}

impl TryFrom<&Value> for Shareable {
    type Error = DefinitionErrorKind;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(name) => Ok(Shareable::Type(name.into())),
            Value::Instance(instance) => Ok(Shareable::Instance(instance.clone())),
            value => Err(DefinitionErrorKind::InvalidArgument {
                operation: "share",
                expected: "a type name or an instance",
                actual: value.kind(),
            }),
        }
    }
}

/// Auto-wiring container.
///
/// Builds objects by walking their constructor parameters and resolving each of them from,
/// in order: the injection definition, the parameter's declared type (through implementation
/// bindings for abstract types and interfaces), the parameter's default value.
///
/// Cloning is cheap and clones share all tables.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    introspector: Arc<dyn Introspector>,
    config: Config,
    definitions: RwLock<BTreeMap<TypeName, Definition>>,
    implementations: RwLock<BTreeMap<TypeName, TypeName>>,
    shared: RwLock<SharedCache>,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new(introspector: impl Introspector + 'static) -> Self {
        Self::with_config(introspector, Config::default())
    }

    #[must_use]
    pub fn with_config(introspector: impl Introspector + 'static, config: Config) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                introspector: Arc::new(introspector),
                config,
                definitions: RwLock::new(BTreeMap::new()),
                implementations: RwLock::new(BTreeMap::new()),
                shared: RwLock::new(SharedCache::new()),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn introspector(&self) -> &dyn Introspector {
        &*self.inner.introspector
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config
    }
}

impl Container {
    /// Builds an instance of the class, using its registered definition if any
    ///
    /// # Errors
    /// Returns the first error met while walking the object graph,
    /// wrapped with the parameter context of every enclosing constructor
    pub fn make(&self, name: impl Into<TypeName>) -> Result<Instance, ResolveErrorKind> {
        self.make_inner(&name.into(), None, &mut Vec::new())
    }

    /// Builds an instance of the class with `definition` instead of its registered one.
    /// Definitions of the dependencies aren't affected.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::Definition`] if `definition` is invalid,
    /// otherwise the same as [`Self::make`]
    pub fn make_with(&self, name: impl Into<TypeName>, definition: &Definition) -> Result<Instance, ResolveErrorKind> {
        definition.validate()?;
        self.make_inner(&name.into(), Some(definition), &mut Vec::new())
    }

    /// Builds an instance of the class and downcasts it to `T`
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::IncorrectType`] if the built instance isn't a `T`,
    /// otherwise the same as [`Self::make`]
    pub fn make_as<T: Any + Send + Sync>(&self, name: impl Into<TypeName>) -> Result<Arc<T>, ResolveErrorKind> {
        let instance = self.make(name)?;
        instance.downcast::<T>().ok_or_else(|| {
            let err = ResolveErrorKind::IncorrectType {
                expected: type_name::<T>(),
                actual: instance.class().clone(),
            };
            error!("{}", err);
            err
        })
    }

    /// Wraps a pre-built value into an instance of the class backed by `T`
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::TypeNotFound`] if no class is backed by `T`
    pub fn instance_of<T: Any + Send + Sync>(&self, value: T) -> Result<Instance, ResolveErrorKind> {
        let class = self.class_of::<T>()?;
        Ok(Instance::new(class, Arc::new(value)))
    }

    fn class_of<T: Any>(&self) -> Result<Arc<ClassDescriptor>, ResolveErrorKind> {
        let Some(name) = self.inner.introspector.class_of(TypeId::of::<T>()) else {
            let err = ResolveErrorKind::TypeNotFound {
                name: TypeName::new(type_name::<T>()),
            };
            warn!("{}", err);
            return Err(err);
        };
        self.inner.introspector.describe_class(&name)
    }

    fn make_inner(&self, name: &TypeName, custom: Option<&Definition>, stack: &mut Vec<TypeName>) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("make", class = %name);
        let _guard = span.enter();

        if let Some(instance) = self.inner.shared.read().get(name) {
            debug!("Found in shared");
            return Ok(instance);
        }

        if stack.contains(name) {
            let mut chain = stack.clone();
            chain.push(name.clone());
            let err = ResolveErrorKind::CyclicDependency { chain };
            error!("{}", err);
            return Err(err);
        }

        let definition = match custom {
            Some(definition) => Cow::Borrowed(definition),
            None => Cow::Owned(self.inner.definitions.read().get(name).cloned().unwrap_or_default()),
        };

        stack.push(name.clone());
        let built = self.build(name, &definition, stack);
        stack.pop();

        let instance = built?;
        debug!("Built");

        Ok(self.inner.shared.write().fill(name, instance))
    }

    fn build(&self, name: &TypeName, definition: &Definition, stack: &mut Vec<TypeName>) -> Result<Instance, ResolveErrorKind> {
        let parameters = match self.inner.introspector.describe_constructor(name)? {
            Some(parameters) if !parameters.is_empty() => parameters,
            _ => return self.build_without_parameters(name, stack),
        };

        let mut values = Vec::with_capacity(parameters.len());
        for parameter in parameters.iter() {
            values.push(self.provide(parameter, definition, stack)?);
        }

        let class = self.inner.introspector.describe_class(name)?;
        self.instantiate(&class, Args::new(values))
    }

    fn build_without_parameters(&self, name: &TypeName, stack: &mut Vec<TypeName>) -> Result<Instance, ResolveErrorKind> {
        let class = self.inner.introspector.describe_class(name)?;

        if class.is_instantiable() {
            return self.instantiate(&class, Args::default());
        }
        if self.is_implemented(name) {
            return self.build_implementation(name, stack);
        }

        let err = ResolveErrorKind::UnresolvableType {
            name: class.name().clone(),
            kind: class.kind(),
        };
        error!("{}", err);
        Err(err)
    }

    fn instantiate(&self, class: &Arc<ClassDescriptor>, args: Args) -> Result<Instance, ResolveErrorKind> {
        let Some(result) = class.instantiate(&args) else {
            let err = ResolveErrorKind::UnresolvableType {
                name: class.name().clone(),
                kind: class.kind(),
            };
            error!("{}", err);
            return Err(err);
        };

        result.map_err(|source| {
            let err = ResolveErrorKind::Instantiate {
                class: class.name().clone(),
                source,
            };
            error!("{}", err);
            err
        })
    }

    /// Builds the class bound to an abstract type or interface and checks that it actually is one
    fn build_implementation(&self, abstraction: &TypeName, stack: &mut Vec<TypeName>) -> Result<Instance, ResolveErrorKind> {
        let Some(concrete) = self.implementation(abstraction) else {
            let class = self.inner.introspector.describe_class(abstraction)?;
            let err = ResolveErrorKind::UnresolvableType {
                name: class.name().clone(),
                kind: class.kind(),
            };
            error!("{}", err);
            return Err(err);
        };
        debug!(implementation = %concrete, "Using implementation of {}", abstraction);

        let instance = self.make_inner(&concrete, None, stack).map_err(|source| ResolveErrorKind::Implementation {
            abstraction: abstraction.clone(),
            concrete: concrete.clone(),
            source: Box::new(source),
        })?;
        if !self.inner.introspector.is_subclass_of(instance.class(), abstraction)? {
            let err = ResolveErrorKind::BadImplementation {
                concrete: instance.class().clone(),
                expected: abstraction.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        Ok(instance)
    }

    fn provide(&self, parameter: &ParameterDescriptor, definition: &Definition, stack: &mut Vec<TypeName>) -> Result<Value, ResolveErrorKind> {
        let wrap = |source: ResolveErrorKind| ResolveErrorKind::Parameter {
            class: parameter.class().clone(),
            param: parameter.name().to_string(),
            position: parameter.position(),
            source: Box::new(source),
        };

        if let Some(value) = definition.class_for(parameter.name()) {
            let Some(ty) = value.as_str() else {
                return Err(wrap(
                    DefinitionErrorKind::InvalidDefinition {
                        param: parameter.name().to_string(),
                    }
                    .into(),
                ));
            };
            debug!(param = parameter.name(), class = ty, "Provided by definition");
            return self.make_inner(&TypeName::new(ty), None, stack).map(Value::Instance).map_err(wrap);
        }

        if let Some(value) = definition.raw_for(parameter.name()).filter(|value| !value.is_null()) {
            debug!(param = parameter.name(), "Provided by raw definition");
            return Ok(value.clone());
        }

        if let Some(ty) = self.inner.introspector.declared_type(parameter) {
            if self.inner.introspector.is_instantiable(&ty).map_err(wrap)? {
                return self.make_inner(&ty, None, stack).map(Value::Instance).map_err(wrap);
            }
            if self.is_implemented(&ty) {
                return self.build_implementation(&ty, stack).map(Value::Instance).map_err(wrap);
            }

            let err = ResolveErrorKind::UnresolvableParameter {
                class: parameter.class().clone(),
                param: parameter.name().to_string(),
                ty,
                position: parameter.position(),
            };
            error!("{}", err);
            return Err(err);
        }

        if let Some(value) = parameter.default_value() {
            return Ok(value.clone());
        }

        if self.inner.config.strict_untyped {
            let err = ResolveErrorKind::UnprovidedParameter {
                class: parameter.class().clone(),
                param: parameter.name().to_string(),
                position: parameter.position(),
            };
            error!("{}", err);
            return Err(err);
        }

        debug!(param = parameter.name(), "Untyped parameter without default, using null");
        Ok(Value::Null)
    }
}

impl Container {
    /// Stores the definition of the class, replacing the previous one
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::InvalidDefinition`] if a bare key holds a non-string value.
    /// The previous definition is kept then.
    pub fn define(&self, name: impl Into<TypeName>, definition: impl Into<Definition>) -> Result<(), DefinitionErrorKind> {
        let definition = definition.into();
        if let Err(err) = definition.validate() {
            warn!("{}", err);
            return Err(err);
        }

        self.inner.definitions.write().insert(name.into(), definition);
        Ok(())
    }

    #[must_use]
    pub fn definition(&self, name: impl Into<TypeName>) -> Option<Definition> {
        self.inner.definitions.read().get(&name.into()).cloned()
    }

    #[must_use]
    pub fn is_defined(&self, name: impl Into<TypeName>) -> bool {
        self.inner.definitions.read().contains_key(&name.into())
    }

    pub fn clear_definition(&self, name: impl Into<TypeName>) {
        self.inner.definitions.write().remove(&name.into());
    }

    pub fn clear_all_definitions(&self) {
        self.inner.definitions.write().clear();
    }

    /// Applies [`Self::define`] to every pair, stopping at the first invalid definition.
    /// Definitions stored before the failure are kept.
    ///
    /// # Errors
    /// Returns the error of the first invalid definition
    pub fn define_all<I, K, D>(&self, definitions: I) -> Result<usize, DefinitionErrorKind>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<TypeName>,
        D: Into<Definition>,
    {
        let mut added = 0;
        for (name, definition) in definitions {
            self.define(name, definition)?;
            added += 1;
        }
        Ok(added)
    }

    /// Dynamic form of [`Self::define_all`] for configuration data: a map of class names to definition maps
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::InvalidArgument`] if `definitions` or one of its entries isn't a map
    pub fn define_all_from(&self, definitions: &Value) -> Result<usize, DefinitionErrorKind> {
        let Value::Map(definitions) = definitions else {
            return Err(DefinitionErrorKind::InvalidArgument {
                operation: "define_all",
                expected: "a map of class names to definitions",
                actual: definitions.kind(),
            });
        };

        let mut added = 0;
        for (name, definition) in definitions {
            self.define(name, Definition::try_from(definition)?)?;
            added += 1;
        }
        Ok(added)
    }
}

impl Container {
    /// Binds an abstract type or interface to the class built for it, replacing the previous binding
    pub fn implement(&self, abstraction: impl Into<TypeName>, concrete: impl Into<TypeName>) {
        self.inner.implementations.write().insert(abstraction.into(), concrete.into());
    }

    #[must_use]
    pub fn implementation(&self, abstraction: impl Into<TypeName>) -> Option<TypeName> {
        self.inner.implementations.read().get(&abstraction.into()).cloned()
    }

    #[must_use]
    pub fn is_implemented(&self, abstraction: impl Into<TypeName>) -> bool {
        self.inner.implementations.read().contains_key(&abstraction.into())
    }

    pub fn clear_implementation(&self, abstraction: impl Into<TypeName>) {
        self.inner.implementations.write().remove(&abstraction.into());
    }

    pub fn clear_all_implementations(&self) {
        self.inner.implementations.write().clear();
    }

    pub fn implement_all<I, A, C>(&self, implementations: I) -> usize
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<TypeName>,
        C: Into<TypeName>,
    {
        let mut added = 0;
        for (abstraction, concrete) in implementations {
            self.implement(abstraction, concrete);
            added += 1;
        }
        added
    }

    /// Dynamic form of [`Self::implement_all`] for configuration data: a map of abstract types to class names
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::InvalidArgument`] if `implementations` isn't a map of strings.
    /// Nothing is bound then.
    pub fn implement_all_from(&self, implementations: &Value) -> Result<usize, DefinitionErrorKind> {
        let Value::Map(implementations) = implementations else {
            return Err(DefinitionErrorKind::InvalidArgument {
                operation: "implement_all",
                expected: "a map of abstract types to class names",
                actual: implementations.kind(),
            });
        };

        let pairs = implementations
            .iter()
            .map(|(abstraction, concrete)| match concrete {
                Value::Str(concrete) => Ok((abstraction, concrete)),
                value => Err(DefinitionErrorKind::InvalidArgument {
                    operation: "implement",
                    expected: "a class name",
                    actual: value.kind(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.implement_all(pairs))
    }
}

impl Container {
    /// Shares a class or an instance.
    ///
    /// A class name marks the class as shared: the next [`Self::make`] builds it and stores the result,
    /// an instance built before is dropped. An instance is stored right away under its runtime class.
    pub fn share(&self, shareable: impl Into<Shareable>) {
        match shareable.into() {
            Shareable::Type(name) => {
                debug!(class = %name, "Marked as shared");
                self.inner.shared.write().mark(name);
            }
            Shareable::Instance(instance) => {
                debug!(class = %instance.class(), "Shared instance stored");
                self.inner.shared.write().insert(instance.class().clone(), instance);
            }
        }
    }

    /// Stores a pre-built instance as the shared instance of its runtime class
    #[inline]
    pub fn share_instance(&self, instance: Instance) {
        self.share(Shareable::Instance(instance));
    }

    /// Shares a pre-built value under the class backed by `T`
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::TypeNotFound`] if no class is backed by `T`
    pub fn share_value<T: Any + Send + Sync>(&self, value: T) -> Result<(), ResolveErrorKind> {
        self.share_instance(self.instance_of(value)?);
        Ok(())
    }

    pub fn share_all<I>(&self, shareables: I)
    where
        I: IntoIterator,
        I::Item: Into<Shareable>,
    {
        for shareable in shareables {
            self.share(shareable);
        }
    }

    /// Dynamic form of [`Self::share_all`] for configuration data: a list of class names or instances
    ///
    /// # Errors
    /// Returns [`DefinitionErrorKind::InvalidArgument`] if `shareables` isn't a list of class names or instances.
    /// Nothing is shared then.
    pub fn share_all_from(&self, shareables: &Value) -> Result<(), DefinitionErrorKind> {
        let Value::List(shareables) = shareables else {
            return Err(DefinitionErrorKind::InvalidArgument {
                operation: "share_all",
                expected: "a list of class names or instances",
                actual: shareables.kind(),
            });
        };

        let shareables = shareables.iter().map(Shareable::try_from).collect::<Result<Vec<_>, _>>()?;
        self.share_all(shareables);
        Ok(())
    }

    /// Whether the class is shared, built or not
    #[must_use]
    pub fn is_shared(&self, name: impl Into<TypeName>) -> bool {
        self.inner.shared.read().contains(&name.into())
    }

    /// Drops the shared instance of the class, so the next [`Self::make`] builds a new one.
    /// Does nothing if the class isn't shared or isn't built yet.
    pub fn refresh(&self, name: impl Into<TypeName>) {
        let name = name.into();
        if self.inner.shared.write().refresh(&name) {
            debug!(class = %name, "Shared instance refreshed");
        }
    }

    /// Stops sharing the class
    pub fn unshare(&self, name: impl Into<TypeName>) {
        let name = name.into();
        if self.inner.shared.write().remove(&name) {
            debug!(class = %name, "Unshared");
        }
    }
}
