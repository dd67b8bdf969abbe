//! LoadReport - Outcome of loading a batch of agent documents

use serde::Serialize;
use shared::Diagnostic;
use std::fmt;
use std::path::Path;

/// What a load produced: registered names plus every diagnostic
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Names registered by this load, in load order
    pub loaded: Vec<String>,

    /// Errors and warnings, each attributed to its document
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Append diagnostics
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No errors and no warnings
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Documents with at least one error, in first-seen order
    pub fn failed_documents(&self) -> Vec<&Path> {
        let mut documents: Vec<&Path> = Vec::new();
        for diagnostic in self.errors() {
            if !documents.contains(&diagnostic.document.as_path()) {
                documents.push(&diagnostic.document);
            }
        }
        documents
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut out = if self.loaded.is_empty() {
            "Loaded 0 agent definitions\n".to_string()
        } else {
            format!(
                "Loaded {} agent definition(s): {}\n",
                self.loaded.len(),
                self.loaded.join(", ")
            )
        };

        if !self.diagnostics.is_empty() {
            out.push_str(&format!(
                "{} error(s), {} warning(s)\n",
                self.errors().count(),
                self.warnings().count()
            ));
            for diagnostic in self.errors().chain(self.warnings()) {
                out.push_str(&format!("  {}\n", diagnostic));
            }
        }

        out
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
