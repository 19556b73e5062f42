use alloc::{boxed::Box, string::String, vec::Vec};

use super::{definition::DefinitionErrorKind, instantiate::InstantiateErrorKind};
use crate::{descriptor::ClassKind, name::TypeName};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Type `{name}` doesn't exist and could not be found by any class loader")]
    TypeNotFound { name: TypeName },
    #[error("Cannot instantiate {kind} `{name}` without an injection definition or implementation")]
    UnresolvableType { name: TypeName, kind: ClassKind },
    #[error(
        "\
        Injection definition or implementation required for non-concrete parameter `{param}` \
        of type `{ty}` at argument {position} of `{class}`\
        "
    )]
    UnresolvableParameter {
        class: TypeName,
        param: String,
        ty: TypeName,
        position: usize,
    },
    #[error("Bad implementation: `{concrete}` does not implement `{expected}`")]
    BadImplementation { concrete: TypeName, expected: TypeName },
    #[error("No value available for untyped parameter `{param}` at argument {position} of `{class}`")]
    UnprovidedParameter {
        class: TypeName,
        param: String,
        position: usize,
    },
    #[error("Cyclic dependency detected: {}", join_chain(.chain))]
    CyclicDependency { chain: Vec<TypeName> },
    #[error("Incorrect instance type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: TypeName },
    #[error("Failed to provision parameter `{param}` at argument {position} of `{class}`: {source}")]
    Parameter {
        class: TypeName,
        param: String,
        position: usize,
        source: Box<ResolveErrorKind>,
    },
    #[error("Failed to build `{concrete}` as the implementation of `{abstraction}`: {source}")]
    Implementation {
        abstraction: TypeName,
        concrete: TypeName,
        source: Box<ResolveErrorKind>,
    },
    #[error("Constructor of `{class}` failed: {source}")]
    Instantiate {
        class: TypeName,
        source: InstantiateErrorKind,
    },
    #[error(transparent)]
    Definition(#[from] DefinitionErrorKind),
}

impl ResolveErrorKind {
    /// Innermost error below the parameter and implementation context wrappers
    #[must_use]
    pub fn root_cause(&self) -> &ResolveErrorKind {
        match self {
            ResolveErrorKind::Parameter { source, .. } | ResolveErrorKind::Implementation { source, .. } => source.root_cause(),
            err => err,
        }
    }
}

fn join_chain(chain: &[TypeName]) -> String {
    chain.iter().map(TypeName::as_str).collect::<Vec<_>>().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::ResolveErrorKind;
    use crate::{descriptor::ClassKind, name::TypeName};

    use alloc::{boxed::Box, string::ToString as _, vec};

    #[test]
    fn test_chain_message() {
        let err = ResolveErrorKind::Parameter {
            class: TypeName::new("Controller"),
            param: "service".to_string(),
            position: 2,
            source: Box::new(ResolveErrorKind::UnresolvableType {
                name: TypeName::new("Logger"),
                kind: ClassKind::Interface,
            }),
        };

        assert_eq!(
            err.to_string(),
            "Failed to provision parameter `service` at argument 2 of `Controller`: \
             Cannot instantiate interface `Logger` without an injection definition or implementation"
        );
        assert!(matches!(err.root_cause(), ResolveErrorKind::UnresolvableType { name, .. } if name == "logger"));
    }

    #[test]
    fn test_implementation_message() {
        let err = ResolveErrorKind::Implementation {
            abstraction: TypeName::new("Logger"),
            concrete: TypeName::new("FileLogger"),
            source: Box::new(ResolveErrorKind::Parameter {
                class: TypeName::new("FileLogger"),
                param: "sink".to_string(),
                position: 1,
                source: Box::new(ResolveErrorKind::TypeNotFound { name: TypeName::new("Sink") }),
            }),
        };

        assert!(err
            .to_string()
            .starts_with("Failed to build `FileLogger` as the implementation of `Logger`: "));
        assert!(matches!(err.root_cause(), ResolveErrorKind::TypeNotFound { name } if name == "Sink"));
    }

    #[test]
    fn test_cycle_message() {
        let err = ResolveErrorKind::CyclicDependency {
            chain: vec![TypeName::new("A"), TypeName::new("B"), TypeName::new("A")],
        };

        assert_eq!(err.to_string(), "Cyclic dependency detected: A -> B -> A");
    }
}
