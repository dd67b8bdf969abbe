//! Agent definition types for Roster

use crate::body::{Body, Link};
use crate::tool::Tool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An illustrative interaction attached to an agent (never executed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub title: String,
    pub input: String,
    pub output: String,
}

/// One parsed agent document
///
/// Built once by the loader and never mutated afterwards; a changed source
/// document is re-parsed into a fresh definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    /// Unique short identifier
    pub name: String,

    /// One-line summary
    pub description: String,

    /// Classification tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,

    /// External skill-package identifiers
    #[serde(default)]
    pub skills: Vec<String>,

    /// Capabilities the agent may invoke
    #[serde(default)]
    pub tools: Vec<Tool>,

    /// Backing model tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default)]
    pub examples: Vec<Example>,

    /// Names of other agents; advisory, resolved through a registry
    #[serde(default)]
    pub related_agents: Vec<String>,

    /// Unknown header fields, preserved verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,

    #[serde(default)]
    pub body: Body,

    /// Document this definition was loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl AgentDefinition {
    /// Create a definition with only the required fields set
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            domain: None,
            subdomain: None,
            skills: Vec::new(),
            tools: Vec::new(),
            model: None,
            examples: Vec::new(),
            related_agents: Vec::new(),
            extra: BTreeMap::new(),
            body: Body::default(),
            source: None,
        }
    }

    /// Check whether the agent may use a tool
    pub fn has_tool(&self, tool: &Tool) -> bool {
        self.tools.contains(tool)
    }

    /// Check whether the agent references a skill
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Check whether the agent lists `name` as related
    pub fn is_related_to(&self, name: &str) -> bool {
        self.related_agents.iter().any(|r| r == name)
    }

    /// Check whether the agent is classified under `domain` (and `subdomain`, if given)
    pub fn in_domain(&self, domain: &str, subdomain: Option<&str>) -> bool {
        let domain_matches = self
            .domain
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(domain));
        let subdomain_matches = match subdomain {
            Some(wanted) => self
                .subdomain
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(wanted)),
            None => true,
        };
        domain_matches && subdomain_matches
    }

    /// Links from the body that point at local documents or scripts
    pub fn references(&self) -> Vec<Link> {
        self.body
            .links()
            .into_iter()
            .filter(|link| !link.is_external() && !link.target.starts_with('#'))
            .collect()
    }

    /// Builder: set domain and subdomain
    pub fn with_domain(mut self, domain: impl Into<String>, subdomain: Option<&str>) -> Self {
        self.domain = Some(domain.into());
        self.subdomain = subdomain.map(str::to_string);
        self
    }

    /// Builder: set tools
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Builder: set skills
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set related agents
    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_agents = related.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set source path
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}
