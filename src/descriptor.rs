use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::{
    any::{Any, TypeId},
    fmt::{self, Debug, Display, Formatter},
    marker::PhantomData,
};

use crate::{
    any::{RcAny, TypeInfo},
    args::Args,
    errors::InstantiateErrorKind,
    name::TypeName,
    value::{Instance, Value},
};

pub(crate) type Factory = Arc<dyn Fn(&Args) -> Result<RcAny, InstantiateErrorKind> + Send + Sync>;
pub(crate) type Caster = Arc<dyn Fn(RcAny) -> Option<RcAny> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
}

impl Display for ClassKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassKind::Concrete => "concrete",
            ClassKind::Abstract => "abstract",
            ClassKind::Interface => "interface",
        })
    }
}

/// A single constructor parameter as declared by its class
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    class: TypeName,
    position: usize,
    name: String,
    declared_type: Option<TypeName>,
    default: Option<Value>,
}

impl ParameterDescriptor {
    /// Class whose constructor declares the parameter
    #[inline]
    #[must_use]
    pub fn class(&self) -> &TypeName {
        &self.class
    }

    /// 1-based ordinal position
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> Option<&TypeName> {
        self.declared_type.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Declaration of a constructor parameter, see [`Class::param`]
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    declared_type: Option<TypeName>,
    default: Option<Value>,
}

impl Param {
    /// Parameter without a declared class type (a scalar or untyped value)
    #[inline]
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: None,
        }
    }

    /// Parameter declared with a class, abstract or interface type
    #[inline]
    #[must_use]
    pub fn typed(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(ty.into()),
            default: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Shape of a class: its identity, instantiability, constructor and supertypes.
///
/// Descriptors are immutable once built and are shared between the class loader,
/// the introspector cache and every [`Instance`] the class produces.
#[derive(Clone)]
pub struct ClassDescriptor {
    name: TypeName,
    kind: ClassKind,
    type_info: Option<TypeInfo>,
    parameters: Option<Arc<[ParameterDescriptor]>>,
    factory: Option<Factory>,
    supertypes: BTreeSet<TypeName>,
    casts: BTreeMap<TypeId, Caster>,
}

impl ClassDescriptor {
    #[must_use]
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::non_concrete(name.into(), ClassKind::Interface)
    }

    #[must_use]
    pub fn abstract_class(name: impl Into<TypeName>) -> Self {
        Self::non_concrete(name.into(), ClassKind::Abstract)
    }

    fn non_concrete(name: TypeName, kind: ClassKind) -> Self {
        Self {
            name,
            kind,
            type_info: None,
            parameters: None,
            factory: None,
            supertypes: BTreeSet::new(),
            casts: BTreeMap::new(),
        }
    }

    /// Declares a parent interface or abstract type
    #[must_use]
    pub fn extends(mut self, name: impl Into<TypeName>) -> Self {
        self.supertypes.insert(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn type_info(&self) -> Option<TypeInfo> {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Concrete && self.factory.is_some()
    }

    /// Constructor parameters, `None` if the class declares no constructor
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> Option<&Arc<[ParameterDescriptor]>> {
        self.parameters.as_ref()
    }

    /// Direct supertypes
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeName> {
        self.supertypes.iter()
    }

    #[inline]
    #[must_use]
    pub fn declares(&self, supertype: &TypeName) -> bool {
        self.supertypes.contains(supertype)
    }

    pub(crate) fn instantiate(self: &Arc<Self>, args: &Args) -> Option<Result<Instance, InstantiateErrorKind>> {
        let factory = self.factory.as_ref()?;
        Some(factory(args).map(|value| Instance::new(self.clone(), value)))
    }

    pub(crate) fn cast<I: ?Sized + Send + Sync + 'static>(&self, value: &RcAny) -> Option<Arc<I>> {
        let caster = self.casts.get(&TypeId::of::<I>())?;
        let cast = caster(value.clone())?.downcast::<Arc<I>>().ok()?;
        Some((*cast).clone())
    }
}

impl Debug for ClassDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type_info", &self.type_info)
            .field("parameters", &self.parameters)
            .field("supertypes", &self.supertypes)
            .finish_non_exhaustive()
    }
}

/// Builder of a concrete class backed by the Rust type `T`
pub struct Class<T> {
    name: TypeName,
    parameters: Vec<ParameterDescriptor>,
    supertypes: BTreeSet<TypeName>,
    casts: BTreeMap<TypeId, Caster>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> Class<T> {
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            supertypes: BTreeSet::new(),
            casts: BTreeMap::new(),
            _marker: PhantomData,
        }
    }

    /// Appends a constructor parameter
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        let Param {
            name,
            declared_type,
            default,
        } = param;
        self.parameters.push(ParameterDescriptor {
            class: self.name.clone(),
            position: self.parameters.len() + 1,
            name,
            declared_type,
            default,
        });
        self
    }

    /// Declares a supertype without a Rust trait object view
    #[must_use]
    pub fn implements(mut self, name: impl Into<TypeName>) -> Self {
        self.supertypes.insert(name.into());
        self
    }

    /// Declares a supertype and how to view `T` as its trait object `I`
    #[must_use]
    pub fn implements_as<I>(mut self, name: impl Into<TypeName>, cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.supertypes.insert(name.into());
        self.casts.insert(
            TypeId::of::<I>(),
            Arc::new(move |value: RcAny| {
                let concrete = value.downcast::<T>().ok()?;
                Some(Arc::new(cast(concrete)) as RcAny)
            }),
        );
        self
    }

    /// Finishes the class with its constructor
    #[must_use]
    pub fn construct<F>(self, constructor: F) -> ClassDescriptor
    where
        F: Fn(&Args) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |args: &Args| constructor(args).map(|value| Arc::new(value) as RcAny));

        ClassDescriptor {
            name: self.name,
            kind: ClassKind::Concrete,
            type_info: Some(TypeInfo::of::<T>()),
            parameters: if self.parameters.is_empty() {
                None
            } else {
                Some(Arc::from(self.parameters))
            },
            factory: Some(factory),
            supertypes: self.supertypes,
            casts: self.casts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Class, ClassDescriptor, ClassKind, Param};
    use crate::{args::Args, value::Value};

    use alloc::{string::String, sync::Arc, vec};

    trait Speaker: Send + Sync {
        fn speak(&self) -> String;
    }

    struct Parrot(String);

    impl Speaker for Parrot {
        fn speak(&self) -> String {
            self.0.clone()
        }
    }

    #[test]
    fn test_concrete_class_shape() {
        let class = Class::<Parrot>::new("Parrot")
            .param(Param::untyped("word").default("hello"))
            .param(Param::typed("owner", "Person"))
            .implements_as::<dyn Speaker>("Speaker", |parrot| parrot as Arc<dyn Speaker>)
            .construct(|args| Ok(Parrot(args.str(0)?.into())));

        assert_eq!(class.kind(), ClassKind::Concrete);
        assert!(class.is_instantiable());
        assert!(class.declares(&"speaker".into()));
        assert_eq!(class.type_info().map(|info| info.short_name()), Some("Parrot"));

        let params = class.parameters().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].position(), 1);
        assert_eq!(params[0].default_value(), Some(&Value::from("hello")));
        assert!(params[0].declared_type().is_none());
        assert_eq!(params[1].position(), 2);
        assert_eq!(params[1].declared_type().unwrap(), "Person");
        assert_eq!(params[1].class(), "parrot");
    }

    #[test]
    fn test_instantiate_and_cast() {
        let class = Arc::new(
            Class::<Parrot>::new("Parrot")
                .param(Param::untyped("word"))
                .implements_as::<dyn Speaker>("Speaker", |parrot| parrot as Arc<dyn Speaker>)
                .construct(|args| Ok(Parrot(args.str(0)?.into()))),
        );

        let instance = class.instantiate(&Args::new(vec![Value::from("polly")])).unwrap().unwrap();

        assert_eq!(instance.class(), "Parrot");
        assert_eq!(instance.downcast::<Parrot>().unwrap().0, "polly");
        assert_eq!(instance.cast::<dyn Speaker>().unwrap().speak(), "polly");
    }

    #[test]
    fn test_non_concrete_has_no_constructor() {
        let interface = Arc::new(ClassDescriptor::interface("Speaker"));
        let base = ClassDescriptor::abstract_class("BaseSpeaker").extends("Speaker");

        assert!(!interface.is_instantiable());
        assert!(interface.parameters().is_none());
        assert!(interface.instantiate(&Args::new(vec![])).is_none());
        assert_eq!(base.kind(), ClassKind::Abstract);
        assert!(base.declares(&"SPEAKER".into()));
    }
}
