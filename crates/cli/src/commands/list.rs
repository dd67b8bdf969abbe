//! roster list command

use crate::context::Context;
use anyhow::Context as _;
use clap::Args;
use console::style;
use registry::Registry;
use serde::Serialize;
use shared::{AgentDefinition, Tool};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Files, directories or glob patterns (defaults to configured agentDirs)
    pub paths: Vec<PathBuf>,

    /// Only agents in this domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Only agents in this subdomain (requires --domain)
    #[arg(long, requires = "domain")]
    pub subdomain: Option<String>,

    /// Only agents allowed to use this tool
    #[arg(long)]
    pub tool: Option<String>,

    /// Only agents referencing this skill
    #[arg(long)]
    pub skill: Option<String>,

    /// Only agents whose name or description contains this text
    #[arg(long)]
    pub search: Option<String>,
}

/// One line of `roster list` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentRow<'a> {
    name: &'a str,
    description: &'a str,
    domain: Option<&'a str>,
    subdomain: Option<&'a str>,
    tools: Vec<String>,
}

impl<'a> From<&'a AgentDefinition> for AgentRow<'a> {
    fn from(agent: &'a AgentDefinition) -> Self {
        Self {
            name: &agent.name,
            description: &agent.description,
            domain: agent.domain.as_deref(),
            subdomain: agent.subdomain.as_deref(),
            tools: agent.tools.iter().map(Tool::to_string).collect(),
        }
    }
}

impl ListCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (registry, report) = ctx.load(&self.paths)?;
        let agents = self.select(&registry)?;

        if ctx.json {
            let rows: Vec<AgentRow> = agents.into_iter().map(AgentRow::from).collect();
            return ctx.print_json(&rows);
        }

        if agents.is_empty() {
            println!("No agents found");
        }

        let width = agents.iter().map(|a| a.name.len()).max().unwrap_or(0);
        for agent in agents {
            let domain = match (&agent.domain, &agent.subdomain) {
                (Some(d), Some(s)) => format!("[{}/{}] ", d, s),
                (Some(d), None) => format!("[{}] ", d),
                _ => String::new(),
            };
            println!(
                "{:width$}  {}{}",
                style(&agent.name).bold(),
                style(domain).dim(),
                agent.description,
                width = width
            );
        }

        if report.has_errors() {
            eprintln!(
                "{} {} document(s) failed to load; run `roster check` for details",
                style("!").yellow(),
                report.failed_documents().len()
            );
        }
        Ok(())
    }

    /// Apply every filter given on the command line
    fn select<'r>(&self, registry: &'r Registry) -> anyhow::Result<Vec<&'r AgentDefinition>> {
        let tool = self
            .tool
            .as_deref()
            .map(|name| {
                Tool::resolve(name, &registry.config().extra_tools)
                    .with_context(|| format!("unknown tool '{}'", name))
            })
            .transpose()?;

        let mut agents = match &self.domain {
            Some(domain) => registry.by_domain(domain, self.subdomain.as_deref()),
            None => registry.definitions(),
        };

        if let Some(tool) = &tool {
            keep_matching(&mut agents, registry.with_tool(tool));
        }
        if let Some(skill) = &self.skill {
            keep_matching(&mut agents, registry.with_skill(skill));
        }
        if let Some(text) = &self.search {
            keep_matching(&mut agents, registry.search(text));
        }

        Ok(agents)
    }
}

/// Narrow `agents` to the definitions also present in `matching`
fn keep_matching<'r>(agents: &mut Vec<&'r AgentDefinition>, matching: Vec<&'r AgentDefinition>) {
    agents.retain(|agent| matching.iter().any(|m| std::ptr::eq(*agent, *m)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> ListCommand {
        ListCommand {
            paths: vec![],
            domain: None,
            subdomain: None,
            tool: None,
            skill: None,
            search: None,
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert(
            AgentDefinition::new("ios-engineer", "Builds iOS apps")
                .with_domain("engineering", Some("mobile"))
                .with_tools(vec![Tool::Read, Tool::Bash]),
        );
        registry.insert(
            AgentDefinition::new("ml-engineer", "Trains models")
                .with_domain("engineering", Some("ml"))
                .with_tools(vec![Tool::Read])
                .with_skills(["ml-ops"]),
        );
        registry
    }

    fn names(agents: Vec<&AgentDefinition>) -> Vec<&str> {
        agents.into_iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_select_all() {
        let registry = registry();
        assert_eq!(names(command().select(&registry).unwrap()), vec!["ios-engineer", "ml-engineer"]);
    }

    #[test]
    fn test_select_combined_filters() {
        let registry = registry();
        let cmd = ListCommand {
            domain: Some("engineering".to_string()),
            tool: Some("read".to_string()),
            skill: Some("ml-ops".to_string()),
            ..command()
        };
        assert_eq!(names(cmd.select(&registry).unwrap()), vec!["ml-engineer"]);
    }

    #[test]
    fn test_select_search_is_case_insensitive() {
        let registry = registry();
        let cmd = ListCommand {
            search: Some("TRAINS".to_string()),
            ..command()
        };
        assert_eq!(names(cmd.select(&registry).unwrap()), vec!["ml-engineer"]);
    }

    #[test]
    fn test_select_unknown_tool_fails() {
        let registry = registry();
        let cmd = ListCommand {
            tool: Some("Teleport".to_string()),
            ..command()
        };
        assert!(cmd.select(&registry).is_err());
    }

    #[test]
    fn test_row_from_definition() {
        let registry = registry();
        let row = AgentRow::from(registry.find("ios-engineer").unwrap());
        assert_eq!(row.tools, vec!["Read", "Bash"]);
        assert_eq!(row.subdomain, Some("mobile"));
    }
}
