#![deny(missing_docs)]

//! # Diagnostics
//!
//! Collects the recoverable conditions met during a run. Every recorded warning
//! is also emitted through `tracing`, so both the log and the caller see it.

use std::fmt;
use std::sync::Mutex;

/// Category of a recovered condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A property or parameter without a name was skipped.
    MissingName,
    /// The second occurrence of a query parameter name was dropped.
    DuplicateQueryParameter,
    /// No response schema and no no-content status code; the executor returns void.
    MissingResponseSchema,
    /// A type reference only bound through the whole-tree fallback search.
    AmbiguousTypeResolution,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningKind::MissingName => "missing-name",
            WarningKind::DuplicateQueryParameter => "duplicate-query-parameter",
            WarningKind::MissingResponseSchema => "missing-response-schema",
            WarningKind::AmbiguousTypeResolution => "ambiguous-type-resolution",
        };
        f.write_str(label)
    }
}

/// A single recovered condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationWarning {
    /// Category.
    pub kind: WarningKind,
    /// Human readable detail, naming the offending path or element.
    pub message: String,
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Thread-safe warning sink shared by the parallel build and binding tasks.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Mutex<Vec<GenerationWarning>>,
}

impl Diagnostics {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a warning.
    pub fn warn(&self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, "{}", message);
        let warning = GenerationWarning { kind, message };
        match self.warnings.lock() {
            Ok(mut guard) => guard.push(warning),
            Err(poisoned) => poisoned.into_inner().push(warning),
        }
    }

    /// Number of recorded warnings.
    pub fn len(&self) -> usize {
        match self.warnings.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a warning of `kind` was recorded.
    pub fn contains(&self, kind: WarningKind) -> bool {
        self.snapshot().iter().any(|w| w.kind == kind)
    }

    /// Copy of the warnings recorded so far.
    pub fn snapshot(&self) -> Vec<GenerationWarning> {
        match self.warnings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Consumes the sink, returning the warnings in recording order.
    pub fn into_warnings(self) -> Vec<GenerationWarning> {
        match self.warnings.into_inner() {
            Ok(warnings) => warnings,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_concurrent_warnings_are_all_recorded() {
        let diagnostics = Diagnostics::new();
        (0..64).into_par_iter().for_each(|i| {
            diagnostics.warn(WarningKind::MissingName, format!("element {}", i));
        });
        assert_eq!(diagnostics.len(), 64);
        assert!(diagnostics.contains(WarningKind::MissingName));
        assert!(!diagnostics.contains(WarningKind::DuplicateQueryParameter));
    }

    #[test]
    fn test_warning_display() {
        let warning = GenerationWarning {
            kind: WarningKind::DuplicateQueryParameter,
            message: "query parameter 'top' declared twice on GET /users".into(),
        };
        assert_eq!(
            warning.to_string(),
            "[duplicate-query-parameter] query parameter 'top' declared twice on GET /users"
        );
    }
}
