//! Configuration types for Roster

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "roster.json";

/// What to do with header fields outside the known schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Keep silently (default)
    #[default]
    Preserve,
    /// Keep and record a warning
    Warn,
    /// Reject the document
    Reject,
}

/// Which definition keeps a name claimed by two documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePolicy {
    /// The first document in load order wins (default)
    #[default]
    KeepFirst,
    /// The last document in load order replaces earlier ones
    KeepLast,
}

/// Options that affect how a single document is decoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub unknown_fields: UnknownFieldPolicy,

    /// Glob patterns admitting tool names outside the built-in set
    pub extra_tools: Vec<String>,
}

impl ParseOptions {
    /// Reject unknown fields
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..Self::default()
        }
    }
}

/// Roster configuration file (roster.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterConfig {
    /// Directories, files or glob patterns holding agent documents
    #[serde(default = "default_agent_dirs")]
    pub agent_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,

    #[serde(default)]
    pub extra_tools: Vec<String>,

    #[serde(default)]
    pub duplicate_names: DuplicatePolicy,
}

fn default_agent_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("agents")]
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            agent_dirs: default_agent_dirs(),
            unknown_fields: UnknownFieldPolicy::default(),
            extra_tools: Vec::new(),
            duplicate_names: DuplicatePolicy::default(),
        }
    }
}

impl RosterConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every extra tool pattern compiles
    pub fn validate(&self) -> crate::Result<()> {
        for pattern in &self.extra_tools {
            glob::Pattern::new(pattern).map_err(|e| {
                crate::RosterError::Config(format!("invalid extraTools pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }

    /// Options passed to the document parser
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            unknown_fields: self.unknown_fields,
            extra_tools: self.extra_tools.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse() {
        let json = r#"{
            "agentDirs": ["agents", "vendor/agents/*.md"],
            "unknownFields": "warn",
            "extraTools": ["mcp__*"],
            "duplicateNames": "keepLast"
        }"#;

        let config: RosterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.agent_dirs.len(), 2);
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Warn);
        assert_eq!(config.duplicate_names, DuplicatePolicy::KeepLast);
        assert_eq!(config.parse_options().extra_tools, vec!["mcp__*".to_string()]);
    }

    #[test]
    fn test_config_defaults() {
        let config: RosterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(config.agent_dirs, vec![PathBuf::from("agents")]);
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Preserve);
        assert_eq!(config.duplicate_names, DuplicatePolicy::KeepFirst);
    }

    #[test]
    fn test_from_file_rejects_bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"extraTools": ["mcp__[*"]}"#).unwrap();

        let err = RosterConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("extraTools"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = RosterConfig::from_file(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(matches!(err, crate::RosterError::Io(_)));
    }

    #[test]
    fn test_strict_options() {
        assert_eq!(ParseOptions::strict().unknown_fields, UnknownFieldPolicy::Reject);
        assert!(ParseOptions::default().extra_tools.is_empty());
    }
}
