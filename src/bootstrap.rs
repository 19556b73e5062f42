use serde::Deserialize;
use tracing::debug;

use crate::{container::Container, errors::DefinitionErrorKind, value::Value};

/// Startup configuration of a container, usually deserialized from a config file.
///
/// ```toml
/// shared = ["App\\Db"]
///
/// [definitions."App\\Mailer"]
/// transport = "App\\SmtpTransport"
/// ":from" = "noreply@example.com"
///
/// [implementations]
/// "App\\Logger" = "App\\FileLogger"
/// ```
///
/// ## Fields
/// - `definitions`:
///   Map of class names to injection definitions.
/// - `implementations`:
///   Map of abstract types and interfaces to the class names built for them.
/// - `shared`:
///   List of class names to share.
///
/// Missing fields are skipped when applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Bootstrap {
    pub definitions: Value,
    pub implementations: Value,
    pub shared: Value,
}

impl Bootstrap {
    /// Applies definitions, then implementations, then shared classes
    ///
    /// # Errors
    /// Returns the first [`DefinitionErrorKind`] met. Sections applied before stay applied.
    pub fn apply(&self, container: &Container) -> Result<(), DefinitionErrorKind> {
        if !self.definitions.is_null() {
            let count = container.define_all_from(&self.definitions)?;
            debug!(count, "Definitions applied");
        }
        if !self.implementations.is_null() {
            let count = container.implement_all_from(&self.implementations)?;
            debug!(count, "Implementations applied");
        }
        if !self.shared.is_null() {
            container.share_all_from(&self.shared)?;
            debug!("Shared classes applied");
        }
        Ok(())
    }
}
