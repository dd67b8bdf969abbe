//! roster export command

use crate::context::Context;
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Files, directories or glob patterns (defaults to configured agentDirs)
    pub paths: Vec<PathBuf>,

    /// Write the manifest here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Version recorded in the manifest
    #[arg(long = "manifest-version", default_value = env!("CARGO_PKG_VERSION"))]
    pub version: String,
}

impl ExportCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (registry, report) = ctx.load(&self.paths)?;
        if report.has_errors() {
            eprintln!("{}", report.summary());
        }

        let manifest = registry.to_manifest(&self.version);
        match &self.output {
            Some(path) => {
                manifest.write(path)?;
                if !ctx.json {
                    println!(
                        "{} Exported {} agent(s) to {}",
                        style("✓").green(),
                        manifest.agents.len(),
                        path.display()
                    );
                }
            }
            None => println!("{}", manifest.to_json()?),
        }
        Ok(())
    }
}
