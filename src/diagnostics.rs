//! Record-level diagnostics accumulated during a single document run.

use serde::{Deserialize, Serialize};

/// Append-only warnings and errors for one document's pipeline run.
///
/// `errors` is reserved for conditions that should block downstream
/// persistence. The restructuring pass only ever adds warnings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it to the log.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    /// Record an error and mirror it to the log.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{message}");
        self.errors.push(message);
    }

    /// Append everything from `other`, keeping order.
    pub fn extend(&mut self, other: Messages) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// A non-empty error list means the file should be treated as failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
