use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Missing constructor argument at position {position}")]
    MissingArgument { position: usize },
    #[error("Incorrect constructor argument type at position {position}. Actual: {actual}, expected: {expected}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        actual: String,
    },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
