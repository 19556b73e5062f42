#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod args;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod definition;
pub(crate) mod descriptor;
pub(crate) mod errors;
pub(crate) mod introspector;
pub(crate) mod loader;
pub(crate) mod name;
pub(crate) mod value;

#[cfg(feature = "autoload")]
#[cfg_attr(docsrs, doc(cfg(feature = "autoload")))]
pub mod autoload;

#[cfg(feature = "serde")]
pub(crate) mod bootstrap;

pub use any::TypeInfo;
pub use args::Args;
pub use config::Config;
pub use container::{Container, Shareable};
pub use definition::{Definition, RAW_PREFIX};
pub use descriptor::{Class, ClassDescriptor, ClassKind, Param, ParameterDescriptor};
pub use errors::{DefinitionErrorKind, InstantiateErrorKind, ResolveErrorKind};
pub use introspector::{FixedIntrospector, Introspector, ReflectionPool};
pub use loader::{Catalog, ClassLoader};
pub use name::TypeName;
pub use value::{Instance, Value};

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use bootstrap::Bootstrap;
