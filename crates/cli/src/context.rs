//! Settings shared by every command

use anyhow::Context as _;
use registry::{LoadReport, Registry};
use serde::Serialize;
use shared::{RosterConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

/// Resolved configuration and output mode
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: RosterConfig,
    /// Print machine-readable JSON instead of text
    pub json: bool,
}

impl Context {
    pub fn new(config: RosterConfig, json: bool) -> Self {
        Self { config, json }
    }

    /// Read `explicit`, else `roster.json` in the working directory, else defaults
    pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<RosterConfig> {
        if let Some(path) = explicit {
            return RosterConfig::from_file(path)
                .with_context(|| format!("failed to read config {}", path.display()));
        }

        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "using local config");
            return RosterConfig::from_file(local)
                .with_context(|| format!("failed to read config {}", local.display()));
        }

        Ok(RosterConfig::default())
    }

    /// Discover and load documents from `paths`, or the configured directories
    pub fn load(&self, paths: &[PathBuf]) -> anyhow::Result<(Registry, LoadReport)> {
        let roots = if paths.is_empty() {
            self.config.agent_dirs.as_slice()
        } else {
            paths
        };

        let documents = loader::discover(roots).context("failed to discover agent documents")?;
        let mut registry = Registry::with_config(self.config.clone());
        let report = registry.load(&documents);
        Ok((registry, report))
    }

    /// Print a value as pretty JSON on stdout
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
