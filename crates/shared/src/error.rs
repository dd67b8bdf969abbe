//! Error types for Roster

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Problems found in a single agent document
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DefinitionError {
    #[error("missing metadata header (expected a leading '---' line)")]
    MissingHeader,

    #[error("metadata header opened on line {line} is never closed")]
    UnterminatedHeader { line: usize },

    #[error("metadata header is not valid YAML: {message}")]
    MalformedHeader { message: String },

    #[error("missing required field '{field}'")]
    MissingRequiredField { field: String },

    #[error("field '{field}' has an invalid value: {message}")]
    InvalidFieldType { field: String, message: String },

    #[error("unknown field '{field}'")]
    UnknownField { field: String, rejected: bool },

    #[error("duplicate key '{key}' in metadata header; the last value wins")]
    DuplicateKey { key: String },

    #[error("agent name '{name}' is already claimed by {}", .existing.display())]
    DuplicateName { name: String, existing: PathBuf },

    #[error("related agent '{target}' of '{agent}' is not loaded")]
    DanglingReference { agent: String, target: String },

    #[error("failed to read document: {message}")]
    Unreadable { message: String },
}

impl DefinitionError {
    /// Shorthand for a missing required field
    pub fn missing(field: impl Into<String>) -> Self {
        DefinitionError::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Shorthand for a field with the wrong shape or value
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DefinitionError::InvalidFieldType {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Warnings never prevent a definition from loading
    pub fn severity(&self) -> Severity {
        match self {
            DefinitionError::DuplicateKey { .. } | DefinitionError::DanglingReference { .. } => {
                Severity::Warning
            }
            DefinitionError::UnknownField { rejected, .. } => {
                if *rejected {
                    Severity::Error
                } else {
                    Severity::Warning
                }
            }
            _ => Severity::Error,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

/// A problem attributed to the document it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub document: PathBuf,
    pub severity: Severity,
    pub error: DefinitionError,
}

impl Diagnostic {
    /// Attribute an error to a document
    pub fn new(document: impl Into<PathBuf>, error: DefinitionError) -> Self {
        Self {
            document: document.into(),
            severity: error.severity(),
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.document.display(), self.error)
    }
}

/// A document was rejected; carries every problem found in it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error(s) in agent definition{}", .errors.len(), first_error(.errors))]
pub struct ParseFailure {
    pub errors: Vec<DefinitionError>,
    pub warnings: Vec<DefinitionError>,
}

fn first_error(errors: &[DefinitionError]) -> String {
    errors
        .first()
        .map(|e| format!(": {}", e))
        .unwrap_or_default()
}

impl ParseFailure {
    /// A failure with a single error and no warnings
    pub fn single(error: DefinitionError) -> Self {
        Self {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// Attribute every error and warning to `document`
    pub fn into_diagnostics(self, document: &Path) -> Vec<Diagnostic> {
        self.errors
            .into_iter()
            .chain(self.warnings)
            .map(|e| Diagnostic::new(document, e))
            .collect()
    }
}

impl From<DefinitionError> for ParseFailure {
    fn from(error: DefinitionError) -> Self {
        ParseFailure::single(error)
    }
}

/// Error returned when an agent is not in the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Agent '{name}' not found. Available agents: {}", .available.join(", "))]
pub struct AgentNotFoundError {
    pub name: String,
    pub available: Vec<String>,
}

/// General Roster error type
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;
