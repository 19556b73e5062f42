mod definition;
mod instantiate;
mod resolve;

pub use definition::DefinitionErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use resolve::ResolveErrorKind;
