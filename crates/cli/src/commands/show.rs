//! roster show command

use crate::context::Context;
use clap::Args;
use console::style;
use registry::Registry;
use shared::AgentDefinition;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Agent name
    pub name: String,

    /// Files, directories or glob patterns (defaults to configured agentDirs)
    pub paths: Vec<PathBuf>,

    /// Print the full body text
    #[arg(long)]
    pub body: bool,
}

impl ShowCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (registry, _) = ctx.load(&self.paths)?;
        let agent = registry.get(&self.name)?;

        if ctx.json {
            return ctx.print_json(agent);
        }

        print!("{}", render(agent, &registry)?);
        if self.body {
            println!();
            print!("{}", agent.body.to_text());
        }
        Ok(())
    }
}

/// Text description of an agent, with related agents resolved
fn render(agent: &AgentDefinition, registry: &Registry) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style(&agent.name).bold()));
    out.push_str(&format!("  {}\n", agent.description));

    if let Some(source) = &agent.source {
        out.push_str(&format!("  source:    {}\n", source.display()));
    }
    if let Some(domain) = &agent.domain {
        match &agent.subdomain {
            Some(sub) => out.push_str(&format!("  domain:    {}/{}\n", domain, sub)),
            None => out.push_str(&format!("  domain:    {}\n", domain)),
        }
    }
    if let Some(model) = &agent.model {
        out.push_str(&format!("  model:     {}\n", model));
    }
    if !agent.tools.is_empty() {
        let tools: Vec<String> = agent.tools.iter().map(ToString::to_string).collect();
        out.push_str(&format!("  tools:     {}\n", tools.join(", ")));
    }
    if !agent.skills.is_empty() {
        out.push_str(&format!("  skills:    {}\n", agent.skills.join(", ")));
    }
    for (key, value) in &agent.extra {
        let rendered = serde_yaml::to_string(value)?;
        out.push_str(&format!("  {}: {}\n", key, rendered.trim_end()));
    }

    let titles = agent.body.titles();
    if !titles.is_empty() {
        out.push_str("\nSections:\n");
        for title in titles {
            out.push_str(&format!("  - {}\n", title));
        }
    }

    if !agent.related_agents.is_empty() {
        out.push_str("\nRelated agents:\n");
        for target in &agent.related_agents {
            match registry.find(target) {
                Some(related) => {
                    out.push_str(&format!("  {} {} - {}\n", style("✓").green(), target, related.description));
                }
                None => {
                    out.push_str(&format!("  {} {} (not loaded)\n", style("?").yellow(), target));
                }
            }
        }
    }

    if !agent.examples.is_empty() {
        out.push_str("\nExamples:\n");
        for example in &agent.examples {
            out.push_str(&format!("  {}\n", style(&example.title).underlined()));
            out.push_str(&format!("    input:  {}\n", example.input.trim()));
            out.push_str(&format!("    output: {}\n", example.output.trim()));
        }
    }

    let referencing = registry.referencing(&agent.name);
    if !referencing.is_empty() {
        out.push_str("\nReferenced by:\n");
        for other in referencing {
            out.push_str(&format!("  {}\n", other.name));
        }
    }

    let references = agent.references();
    if !references.is_empty() {
        out.push_str("\nReferences:\n");
        for link in references {
            out.push_str(&format!("  {} ({})\n", link.target, link.text));
        }
    }

    Ok(out)
}
