//! roster check command

use crate::context::Context;
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Files, directories or glob patterns (defaults to configured agentDirs)
    pub paths: Vec<PathBuf>,

    /// Treat warnings as failures
    #[arg(long)]
    pub deny_warnings: bool,
}

impl CheckCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (_, report) = ctx.load(&self.paths)?;

        if ctx.json {
            ctx.print_json(&report)?;
        } else {
            println!(
                "{} Loaded {} agent definition(s)",
                style("✓").green(),
                report.loaded.len()
            );
            for name in &report.loaded {
                println!("  {}", name);
            }
            for diagnostic in report.errors() {
                println!("{} {}", style("✗").red(), diagnostic);
            }
            for diagnostic in report.warnings() {
                println!("{} {}", style("!").yellow(), diagnostic);
            }
        }

        let failures = report.errors().count();
        let warnings = report.warnings().count();
        if failures > 0 {
            anyhow::bail!("{} error(s) found in agent documents", failures);
        }
        if self.deny_warnings && warnings > 0 {
            anyhow::bail!("{} warning(s) found in agent documents", warnings);
        }
        Ok(())
    }
}
