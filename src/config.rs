/// Config for a container
/// ## Fields
/// - `strict_untyped`:
///   If `true`, a constructor parameter without a declared type, a definition entry and a default value
///   fails the resolution with [`crate::ResolveErrorKind::UnprovidedParameter`].
///
///   If `false`, such a parameter receives [`crate::Value::Null`].
///   This is permissive, constructors are expected to check the value themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub strict_untyped: bool,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict_untyped: true }
    }
}
