//! Manifest - Serializable snapshot of a registry

use serde::{Deserialize, Serialize};
use shared::{AgentDefinition, Result};
use std::path::Path;

/// Every loaded definition plus provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Definitions, sorted by name
    pub agents: Vec<AgentDefinition>,

    /// Manifest version
    pub version: String,

    /// RFC 3339 creation time
    pub generated_at: String,
}

impl Manifest {
    /// Snapshot definitions, stamping the current time
    pub fn new(agents: Vec<AgentDefinition>, version: &str) -> Self {
        Self {
            agents,
            version: version.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Agent names in manifest order
    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write JSON to a file, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a manifest back from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Tool;

    #[test]
    fn test_manifest_json_shape() {
        let manifest = Manifest::new(
            vec![AgentDefinition::new("qa-engineer", "QA").with_tools(vec![Tool::Read, Tool::Grep])],
            "1.0.0",
        );
        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();

        assert_eq!(json["version"], "1.0.0");
        assert!(json["generatedAt"].as_str().unwrap().contains('T'));
        assert_eq!(json["agents"][0]["name"], "qa-engineer");
        assert_eq!(json["agents"][0]["tools"], serde_json::json!(["Read", "Grep"]));
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/manifest.json");

        let manifest = Manifest::new(vec![AgentDefinition::new("a", "d")], "2.0.0");
        manifest.write(&path).unwrap();

        let loaded = Manifest::from_file(&path).unwrap();
        assert_eq!(loaded.names(), vec!["a"]);
        assert_eq!(loaded.generated_at, manifest.generated_at);
    }
}
