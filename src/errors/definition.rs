use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum DefinitionErrorKind {
    #[error(
        "\
        Invalid injection definition for parameter `{param}`. \
        Raw parameter names must be prefixed with `:` (:{param}) to differentiate them from provisionable type names\
        "
    )]
    InvalidDefinition { param: String },
    #[error("`{operation}` expects {expected}; {actual} specified")]
    InvalidArgument {
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}
