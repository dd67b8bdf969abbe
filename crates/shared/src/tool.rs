//! Tool types for Roster

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A capability an agent may invoke
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    Read,
    Write,
    Edit,
    MultiEdit,
    Bash,
    Grep,
    Glob,
    LS,
    WebFetch,
    WebSearch,
    Task,
    TodoWrite,
    NotebookRead,
    NotebookEdit,
    /// A tool outside the built-in set, admitted by configuration
    Custom(String),
}

impl Tool {
    /// Every built-in tool, in canonical order
    pub const KNOWN: [Tool; 14] = [
        Tool::Read,
        Tool::Write,
        Tool::Edit,
        Tool::MultiEdit,
        Tool::Bash,
        Tool::Grep,
        Tool::Glob,
        Tool::LS,
        Tool::WebFetch,
        Tool::WebSearch,
        Tool::Task,
        Tool::TodoWrite,
        Tool::NotebookRead,
        Tool::NotebookEdit,
    ];

    /// Canonical spelling
    pub fn as_str(&self) -> &str {
        match self {
            Tool::Read => "Read",
            Tool::Write => "Write",
            Tool::Edit => "Edit",
            Tool::MultiEdit => "MultiEdit",
            Tool::Bash => "Bash",
            Tool::Grep => "Grep",
            Tool::Glob => "Glob",
            Tool::LS => "LS",
            Tool::WebFetch => "WebFetch",
            Tool::WebSearch => "WebSearch",
            Tool::Task => "Task",
            Tool::TodoWrite => "TodoWrite",
            Tool::NotebookRead => "NotebookRead",
            Tool::NotebookEdit => "NotebookEdit",
            Tool::Custom(name) => name,
        }
    }

    /// Whether this tool is part of the built-in set
    pub fn is_known(&self) -> bool {
        !matches!(self, Tool::Custom(_))
    }

    /// Resolve a tool name, admitting custom names that match one of `extra`.
    ///
    /// Built-in names match ASCII case-insensitively. `extra` entries are
    /// glob patterns such as `mcp__*`; invalid patterns are compared literally.
    pub fn resolve(name: &str, extra: &[String]) -> Option<Tool> {
        if let Ok(tool) = name.parse::<Tool>() {
            return Some(tool);
        }

        let admitted = extra.iter().any(|pattern| match glob::Pattern::new(pattern) {
            Ok(p) => p.matches(name),
            Err(_) => pattern == name,
        });

        admitted.then(|| Tool::Custom(name.to_string()))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not a built-in tool
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized tool '{0}'")]
pub struct UnknownToolError(pub String);

impl FromStr for Tool {
    type Err = UnknownToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::KNOWN
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .cloned()
            .ok_or_else(|| UnknownToolError(s.to_string()))
    }
}

impl Serialize for Tool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or(Tool::Custom(name)))
    }
}
