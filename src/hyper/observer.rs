//! Diagnostics emitted by the engine and the observers that receive them.
//!
//! Nothing here aborts an operation: structural failures are [`crate::TransformError`]s.
//! Diagnostics cover what the caller should know about but may choose to ignore, such as a
//! transformer assigned to a column of a different sdtype.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::field::Field;
use crate::sdtype::Sdtype;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational output, e.g. the detected config.
    Info,
    /// Non-fatal problem.
    Warning,
}

/// Something the engine wants the caller to know.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A config was detected from data. Holds the config rendered as JSON.
    ConfigDetected { config: String },
    /// A transformer was assigned to a field of a different sdtype.
    SdtypeMismatch {
        field: Field,
        field_sdtype: Sdtype,
        transformer_sdtype: Sdtype,
    },
    /// Configured fields that were not present in the fitted data.
    UnfittedFields { fields: Vec<Field> },
    /// The configuration changed after a fit.
    RefitRequired,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::ConfigDetected { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match self {
            Diagnostic::ConfigDetected { config } => format!(
                "Detecting a new config from the data ... SUCCESS\n\
                 Setting the new config ... SUCCESS\n\
                 Config:\n{config}"
            ),
            Diagnostic::SdtypeMismatch {
                field,
                field_sdtype,
                transformer_sdtype,
            } => format!(
                "You are assigning a {transformer_sdtype} transformer to a {field_sdtype} column \
                 ({field}). If the transformer doesn't match the sdtype, it may lead to errors."
            ),
            Diagnostic::UnfittedFields { fields } => {
                let names: Vec<String> = fields.iter().map(ToString::to_string).collect();
                format!(
                    "The following fields were specified in the input arguments but not found in \
                     the data: {}",
                    names.join(", ")
                )
            }
            Diagnostic::RefitRequired => {
                "For this change to take effect, please refit your data using 'fit' or \
                 'fit_transform'."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Receives diagnostics from a [`crate::HyperTransformer`].
pub trait HyperObserver: Send + Sync {
    fn on_diagnostic(&self, diagnostic: &Diagnostic);
}

/// Prints info to stdout and warnings to stderr.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl HyperObserver for ConsoleObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => println!("{diagnostic}"),
            Severity::Warning => eprintln!("warning: {diagnostic}"),
        }
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl HyperObserver for TracingObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => tracing::info!(message = %diagnostic),
            Severity::Warning => tracing::warn!(message = %diagnostic),
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Recorded warnings only.
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.severity() == Severity::Warning)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut d) = self.diagnostics.lock() {
            d.clear();
        }
    }
}

impl HyperObserver for RecordingObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        if let Ok(mut d) = self.diagnostics.lock() {
            d.push(diagnostic.clone());
        }
    }
}

/// Fans diagnostics out to several observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn HyperObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn HyperObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl HyperObserver for CompositeObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        for o in &self.observers {
            o.on_diagnostic(diagnostic);
        }
    }
}
