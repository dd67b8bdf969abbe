//! Registry - Loaded agent definitions keyed by name

use crate::manifest::Manifest;
use crate::report::LoadReport;
use loader::{discover, load_document};
use rayon::prelude::*;
use shared::{
    AgentDefinition, AgentNotFoundError, DefinitionError, Diagnostic, DuplicatePolicy, Result,
    RosterConfig, Tool,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Registry holds every loaded agent definition and resolves cross references
#[derive(Debug, Default)]
pub struct Registry {
    /// Definitions by name
    agents: HashMap<String, AgentDefinition>,
    /// Parsing and duplicate-handling settings
    config: RosterConfig,
}

impl Registry {
    /// Create an empty registry with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given settings
    pub fn with_config(config: RosterConfig) -> Self {
        Self {
            agents: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Load every document under the configured agent directories
    pub fn load_configured(&mut self) -> Result<LoadReport> {
        let paths = discover(&self.config.agent_dirs)?;
        Ok(self.load(&paths))
    }

    /// Load documents, continuing past malformed ones.
    ///
    /// Documents are parsed in parallel, then registered one by one in input
    /// order, so duplicate-name resolution does not depend on scheduling.
    /// Cross references are checked over the whole registry afterwards.
    pub fn load<P: AsRef<Path> + Sync>(&mut self, paths: &[P]) -> LoadReport {
        let options = self.config.parse_options();
        let parsed: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_path_buf(), load_document(path, &options))
            })
            .collect();

        let mut report = LoadReport::default();

        for (path, result) in parsed {
            self.forget(&path);
            match result {
                Ok(document) => {
                    report.extend(
                        document
                            .warnings
                            .into_iter()
                            .map(|w| Diagnostic::new(&path, w)),
                    );

                    let name = document.definition.name.clone();
                    let conflict = self.insert(document.definition);
                    let kept = self.agents.get(&name).and_then(|d| d.source.as_deref()) == Some(path.as_path());
                    if kept && !report.loaded.contains(&name) {
                        report.loaded.push(name);
                    }
                    report.extend(conflict);
                }
                Err(failure) => report.extend(failure.into_diagnostics(&path)),
            }
        }

        report.extend(self.validate_cross_references());

        for diagnostic in report.warnings() {
            tracing::warn!(document = %diagnostic.document.display(), "{}", diagnostic.error);
        }
        tracing::info!(
            loaded = report.loaded.len(),
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "loaded agent definitions"
        );

        report
    }

    /// Re-parse one document and replace whatever it previously defined.
    ///
    /// If the document now fails, its old definition is gone as well.
    pub fn reload(&mut self, path: &Path) -> LoadReport {
        tracing::debug!(path = %path.display(), "reloading agent document");
        self.load(&[path])
    }

    /// Drop every definition loaded from `path`
    fn forget(&mut self, path: &Path) {
        self.agents
            .retain(|_, definition| definition.source.as_deref() != Some(path));
    }

    /// Register a definition, applying the duplicate-name policy.
    ///
    /// Returns a `DuplicateName` diagnostic attributed to the losing document
    /// when the name was already taken by a different document. A definition
    /// from the same source document replaces the old one silently.
    pub fn insert(&mut self, definition: AgentDefinition) -> Option<Diagnostic> {
        let same_source = |existing: &AgentDefinition| {
            existing.source.is_some() && existing.source == definition.source
        };
        let Some(existing) = self.agents.get(&definition.name).filter(|e| !same_source(*e)) else {
            self.agents.insert(definition.name.clone(), definition);
            return None;
        };

        let name = definition.name.clone();
        match self.config.duplicate_names {
            DuplicatePolicy::KeepFirst => Some(Diagnostic::new(
                origin(&definition),
                DefinitionError::DuplicateName {
                    name,
                    existing: origin(existing),
                },
            )),
            DuplicatePolicy::KeepLast => {
                let diagnostic = Diagnostic::new(
                    origin(existing),
                    DefinitionError::DuplicateName {
                        name: name.clone(),
                        existing: origin(&definition),
                    },
                );
                self.agents.insert(name, definition);
                Some(diagnostic)
            }
        }
    }

    /// Get a definition by name
    pub fn get(&self, name: &str) -> std::result::Result<&AgentDefinition, AgentNotFoundError> {
        self.agents.get(name).ok_or_else(|| AgentNotFoundError {
            name: name.to_string(),
            available: self.names().into_iter().map(str::to_string).collect(),
        })
    }

    /// Look up a definition by name
    pub fn find(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.get(name)
    }

    /// Check if an agent is loaded
    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// All agent names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.agents.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// All definitions, sorted by name
    pub fn definitions(&self) -> Vec<&AgentDefinition> {
        self.filter(|_| true)
    }

    /// One `DanglingReference` warning per related agent that is not loaded
    pub fn validate_cross_references(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for definition in self.definitions() {
            for target in &definition.related_agents {
                if !self.contains(target) {
                    diagnostics.push(Diagnostic::new(
                        origin(definition),
                        DefinitionError::DanglingReference {
                            agent: definition.name.clone(),
                            target: target.clone(),
                        },
                    ));
                }
            }
        }

        diagnostics
    }

    /// Resolve an agent's related agents; missing ones are skipped
    pub fn related(&self, name: &str) -> std::result::Result<Vec<&AgentDefinition>, AgentNotFoundError> {
        let definition = self.get(name)?;
        Ok(definition
            .related_agents
            .iter()
            .filter_map(|target| self.find(target))
            .collect())
    }

    /// Agents that list `name` among their related agents
    pub fn referencing(&self, name: &str) -> Vec<&AgentDefinition> {
        self.filter(|d| d.is_related_to(name))
    }

    /// Agents classified under a domain (and subdomain, if given)
    pub fn by_domain(&self, domain: &str, subdomain: Option<&str>) -> Vec<&AgentDefinition> {
        self.filter(|d| d.in_domain(domain, subdomain))
    }

    /// Agents allowed to use a tool
    pub fn with_tool(&self, tool: &Tool) -> Vec<&AgentDefinition> {
        self.filter(|d| d.has_tool(tool))
    }

    /// Agents referencing a skill package
    pub fn with_skill(&self, skill: &str) -> Vec<&AgentDefinition> {
        self.filter(|d| d.has_skill(skill))
    }

    /// Case-insensitive search over names and descriptions
    pub fn search(&self, text: &str) -> Vec<&AgentDefinition> {
        let needle = text.to_lowercase();
        self.filter(|d| {
            d.name.to_lowercase().contains(&needle) || d.description.to_lowercase().contains(&needle)
        })
    }

    /// Snapshot of every definition
    pub fn to_manifest(&self, version: &str) -> Manifest {
        Manifest::new(self.definitions().into_iter().cloned().collect(), version)
    }

    fn filter<F>(&self, predicate: F) -> Vec<&AgentDefinition>
    where
        F: Fn(&AgentDefinition) -> bool,
    {
        let mut matches: Vec<_> = self.agents.values().filter(|d| predicate(d)).collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }
}

/// Where a definition came from, for diagnostics
fn origin(definition: &AgentDefinition) -> PathBuf {
    definition
        .source
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("<{}>", definition.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn write_agent(dir: &TempDir, file: &str, content: &str) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, content).unwrap();
        path
    }

    fn agent_doc(name: &str, related: &[&str]) -> String {
        let mut doc = format!("---\nname: {}\ndescription: The {} agent\n", name, name);
        if !related.is_empty() {
            doc.push_str(&format!("relatedAgents: [{}]\n", related.join(", ")));
        }
        doc.push_str("---\n\n## Purpose\n\nHelp.\n");
        doc
    }

    // ============== Loading Tests ==============

    #[test]
    fn test_load_resolves_related_agents() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_agent(&dir, "a.md", &agent_doc("a", &["b"]));
        let b = write_agent(&dir, "b.md", &agent_doc("b", &[]));

        let mut registry = Registry::new();
        let report = registry.load(&[a, b]);

        assert!(report.is_clean(), "{}", report.summary());
        assert_eq!(report.loaded, vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().related_agents, vec!["b"]);

        let related = registry.related("a").unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].name, "b");
    }

    #[test]
    fn test_load_continues_past_missing_description() {
        let dir = tempfile::tempdir().unwrap();
        let good1 = write_agent(&dir, "one.md", &agent_doc("one", &[]));
        let bad = write_agent(&dir, "bad.md", "---\nname: bad\n---\nbody\n");
        let good2 = write_agent(&dir, "two.md", &agent_doc("two", &[]));

        let mut registry = Registry::new();
        let report = registry.load(&[good1, bad.clone(), good2]);

        assert_eq!(registry.len(), 2);
        assert_eq!(report.loaded.len(), 2);

        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].document, bad);
        assert_eq!(errors[0].error, DefinitionError::missing("description"));
        assert!(registry.find("bad").is_none());
    }

    #[test]
    fn test_load_reports_every_broken_document() {
        let dir = tempfile::tempdir().unwrap();
        let no_header = write_agent(&dir, "x.md", "# Not an agent\n");
        let bad_tool = write_agent(&dir, "y.md", "---\nname: y\ndescription: d\ntools: [Hover]\n---\n");
        let missing = dir.path().join("missing.md");

        let mut registry = Registry::new();
        let report = registry.load(&[no_header, bad_tool, missing]);

        assert!(registry.is_empty());
        assert_eq!(report.errors().count(), 3);
        assert_eq!(report.failed_documents().len(), 3);
    }

    #[test]
    fn test_load_keeps_header_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_agent(&dir, "a.md", "---\nname: a\nname: a\ndescription: d\n---\n");

        let mut registry = Registry::new();
        let report = registry.load(&[path]);

        assert_eq!(registry.len(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.errors().count(), 0);
    }

    #[test]
    fn test_load_configured_discovers_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_agent(&dir, "a.md", &agent_doc("a", &[]));
        write_agent(&dir, "b.md", &agent_doc("b", &["a"]));

        let config = RosterConfig {
            agent_dirs: vec![dir.path().to_path_buf()],
            ..RosterConfig::default()
        };
        let mut registry = Registry::with_config(config);
        let report = registry.load_configured().unwrap();

        assert!(report.is_clean());
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_configured_rejects_missing_dir() {
        let config = RosterConfig {
            agent_dirs: vec![PathBuf::from("/nonexistent/agents")],
            ..RosterConfig::default()
        };
        let mut registry = Registry::with_config(config);
        assert!(registry.load_configured().is_err());
    }

    #[test]
    fn test_config_extra_tools_apply_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_agent(&dir, "a.md", "---\nname: a\ndescription: d\ntools: [Read, mcp__jira]\n---\n");

        let mut strict = Registry::new();
        assert_eq!(strict.load(&[path.clone()]).errors().count(), 1);

        let config = RosterConfig {
            extra_tools: vec!["mcp__*".to_string()],
            ..RosterConfig::default()
        };
        let mut relaxed = Registry::with_config(config);
        assert!(relaxed.load(&[path]).is_clean());
        assert!(relaxed.get("a").unwrap().has_tool(&Tool::Custom("mcp__jira".to_string())));
    }

    // ============== Duplicate Name Tests ==============

    #[test]
    fn test_duplicate_name_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_agent(&dir, "first.md", &agent_doc("same", &[]));
        let second = write_agent(&dir, "second.md", &agent_doc("same", &[]));

        let mut registry = Registry::new();
        let report = registry.load(&[first.clone(), second.clone()]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("same").unwrap().source.as_deref(), Some(first.as_path()));
        assert_eq!(report.loaded, vec!["same"]);

        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].document, second);
        assert_eq!(
            errors[0].error,
            DefinitionError::DuplicateName {
                name: "same".to_string(),
                existing: first
            }
        );
    }

    #[test]
    fn test_duplicate_name_follows_given_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_agent(&dir, "a.md", &agent_doc("same", &[]));
        let b = write_agent(&dir, "b.md", &agent_doc("same", &[]));

        let paths = discover(&[b.clone(), a.clone()]).unwrap();
        let mut registry = Registry::new();
        let report = registry.load(&paths);

        assert_eq!(registry.get("same").unwrap().source.as_deref(), Some(b.as_path()));
        assert_eq!(report.errors().next().unwrap().document, a);
    }

    #[test]
    fn test_duplicate_name_keep_last() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_agent(&dir, "first.md", &agent_doc("same", &[]));
        let second = write_agent(&dir, "second.md", &agent_doc("same", &[]));

        let config = RosterConfig {
            duplicate_names: DuplicatePolicy::KeepLast,
            ..RosterConfig::default()
        };
        let mut registry = Registry::with_config(config);
        let report = registry.load(&[first.clone(), second.clone()]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("same").unwrap().source.as_deref(), Some(second.as_path()));
        assert_eq!(report.loaded, vec!["same"]);

        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].document, first);
    }

    #[test]
    fn test_insert_in_memory_definitions() {
        let mut registry = Registry::new();
        assert!(registry.insert(AgentDefinition::new("a", "first")).is_none());

        let diagnostic = registry.insert(AgentDefinition::new("a", "second")).unwrap();
        assert_eq!(diagnostic.document, PathBuf::from("<a>"));
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(registry.get("a").unwrap().description, "first");
    }

    // ============== Cross Reference Tests ==============

    #[test]
    fn test_dangling_reference_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_agent(&dir, "a.md", &agent_doc("a", &["ghost"]));

        let mut registry = Registry::new();
        let report = registry.load(&[a.clone()]);

        assert!(registry.get("a").is_ok());
        assert_eq!(report.errors().count(), 0);

        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].document, a);
        assert_eq!(
            warnings[0].error,
            DefinitionError::DanglingReference {
                agent: "a".to_string(),
                target: "ghost".to_string()
            }
        );
        assert!(registry.related("a").unwrap().is_empty());
    }

    #[test]
    fn test_cross_references_resolve_after_later_load() {
        let mut registry = Registry::new();
        registry.insert(AgentDefinition::new("a", "d").with_related(["b"]));
        assert_eq!(registry.validate_cross_references().len(), 1);

        registry.insert(AgentDefinition::new("b", "d"));
        assert!(registry.validate_cross_references().is_empty());
    }

    #[test]
    fn test_cycles_are_fine() {
        let mut registry = Registry::new();
        registry.insert(AgentDefinition::new("a", "d").with_related(["b"]));
        registry.insert(AgentDefinition::new("b", "d").with_related(["a"]));

        assert!(registry.validate_cross_references().is_empty());
        assert_eq!(registry.related("b").unwrap()[0].name, "a");
        assert_eq!(registry.referencing("a")[0].name, "b");
    }

    // ============== Lookup Tests ==============

    #[test]
    fn test_get_not_found_lists_available() {
        let mut registry = Registry::new();
        registry.insert(AgentDefinition::new("b", "d"));
        registry.insert(AgentDefinition::new("a", "d"));

        let err = registry.get("zzz").unwrap_err();
        assert_eq!(err.available, vec!["a", "b"]);
        assert!(registry.related("zzz").is_err());
    }

    #[test]
    fn test_queries() {
        let mut registry = Registry::new();
        registry.insert(
            AgentDefinition::new("ios-engineer", "Builds iOS apps")
                .with_domain("engineering", Some("mobile"))
                .with_tools(vec![Tool::Read, Tool::Bash])
                .with_skills(["ios-development"]),
        );
        registry.insert(
            AgentDefinition::new("qa-engineer", "Automates QA")
                .with_domain("engineering", Some("quality"))
                .with_tools(vec![Tool::Read]),
        );
        registry.insert(AgentDefinition::new("writer", "Writes docs"));

        let names = |defs: Vec<&AgentDefinition>| defs.iter().map(|d| d.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(registry.by_domain("engineering", None)), vec!["ios-engineer", "qa-engineer"]);
        assert_eq!(names(registry.by_domain("engineering", Some("mobile"))), vec!["ios-engineer"]);
        assert_eq!(names(registry.with_tool(&Tool::Read)), vec!["ios-engineer", "qa-engineer"]);
        assert_eq!(names(registry.with_tool(&Tool::Bash)), vec!["ios-engineer"]);
        assert_eq!(names(registry.with_skill("ios-development")), vec!["ios-engineer"]);
        assert_eq!(names(registry.search("DOCS")), vec!["writer"]);
        assert_eq!(names(registry.search("engineer")), vec!["ios-engineer", "qa-engineer"]);
        assert_eq!(names(registry.definitions()), vec!["ios-engineer", "qa-engineer", "writer"]);
    }

    // ============== Reload Tests ==============

    #[test]
    fn test_reload_replaces_definition_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_agent(&dir, "a.md", &agent_doc("a", &["b"]));

        let mut registry = Registry::new();
        registry.load(&[path.clone()]);
        assert_eq!(registry.get("a").unwrap().related_agents, vec!["b"]);

        fs::write(&path, agent_doc("renamed", &[])).unwrap();
        let report = registry.reload(&path);

        assert!(report.is_clean());
        assert!(registry.find("a").is_none());
        assert!(registry.get("renamed").unwrap().related_agents.is_empty());
    }

    #[test]
    fn test_reload_of_broken_document_drops_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_agent(&dir, "a.md", &agent_doc("a", &[]));

        let mut registry = Registry::new();
        registry.load(&[path.clone()]);

        fs::write(&path, "---\nname: a\n").unwrap();
        let report = registry.reload(&path);

        assert!(registry.is_empty());
        assert_eq!(
            report.errors().next().unwrap().error,
            DefinitionError::UnterminatedHeader { line: 1 }
        );
    }

    #[test]
    fn test_loading_same_document_twice_is_not_a_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_agent(&dir, "a.md", &agent_doc("a", &[]));

        let mut registry = Registry::new();
        registry.load(&[path.clone()]);
        fs::write(&path, agent_doc("a", &["b"])).unwrap();
        let report = registry.load(&[path.clone()]);

        assert_eq!(report.loaded, vec!["a"]);
        assert!(!report.has_errors(), "{}", report);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().related_agents, vec!["b"]);
    }

    #[test]
    fn test_insert_same_source_replaces_silently() {
        let mut registry = Registry::new();
        assert!(registry.insert(AgentDefinition::new("a", "old").with_source("a.md")).is_none());
        assert!(registry.insert(AgentDefinition::new("a", "new").with_source("a.md")).is_none());
        assert_eq!(registry.get("a").unwrap().description, "new");

        let conflict = registry.insert(AgentDefinition::new("a", "other").with_source("b.md"));
        assert!(conflict.is_some());
        assert_eq!(registry.get("a").unwrap().description, "new");
    }

    #[test]
    fn test_reload_via_load_drops_renamed_definition() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_agent(&dir, "a.md", &agent_doc("a", &[]));

        let mut registry = Registry::new();
        registry.load(&[path.clone()]);
        fs::write(&path, agent_doc("z", &[])).unwrap();
        registry.load(&[path]);

        assert_eq!(registry.names(), vec!["z"]);
    }

    // ============== Manifest Tests ==============

    #[test]
    fn test_to_manifest_sorted() {
        let mut registry = Registry::new();
        registry.insert(AgentDefinition::new("b", "d"));
        registry.insert(AgentDefinition::new("a", "d"));

        let manifest = registry.to_manifest("1.0.0");
        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.agents[0].name, "a");
        assert_eq!(manifest.agents[1].name, "b");
    }
}
