//! roster init command

use clap::Args;
use shared::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

const IOS_ENGINEER: &str = r#"---
name: ios-engineer
description: Builds and ships native iOS applications with SwiftUI
domain: engineering
subdomain: mobile
tools: [Read, Write, Edit, Bash, Grep]
skills:
  - swiftui
  - xcode
relatedAgents:
  - qa-engineer
examples:
  - title: New screen
    input: Add a settings screen with a dark mode toggle
    output: A SwiftUI view bound to an @AppStorage flag, plus a preview
---
# iOS Engineer

## Role

Designs, implements and debugs iOS features end to end.

## Guidelines

- Prefer SwiftUI for new screens.
- Keep view models free of UIKit imports.

## Related Agents

- [qa-engineer](qa-engineer.md) - verifies builds before release
"#;

const QA_ENGINEER: &str = r#"---
name: qa-engineer
description: Plans and runs test passes for mobile releases
domain: engineering
subdomain: quality
tools: [Read, Grep, Glob, Bash]
skills: test-planning, regression
relatedAgents: [ios-engineer]
---
# QA Engineer

## Role

Writes test plans and reports regressions with reproduction steps.

## Related Agents

- `ios-engineer` - fixes the bugs this agent files
"#;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Create the config and an empty agents directory only
    #[arg(long)]
    pub minimal: bool,
}

impl InitCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let config_path = self.directory.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            anyhow::bail!("{} already exists", config_path.display());
        }

        println!("Initializing roster in {}", self.directory.display());

        let agents_dir = self.directory.join("agents");
        std::fs::create_dir_all(&agents_dir)?;
        let config = serde_json::json!({
            "agentDirs": ["agents"],
            "unknownFields": "preserve",
            "extraTools": [],
            "duplicateNames": "keepFirst"
        });
        std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

        if !self.minimal {
            self.create_sample_agents(&agents_dir)?;
        }

        println!("✓ roster initialized");
        Ok(())
    }

    fn create_sample_agents(&self, agents_dir: &Path) -> anyhow::Result<()> {
        for (file, content) in [("ios-engineer.md", IOS_ENGINEER), ("qa-engineer.md", QA_ENGINEER)] {
            let path = agents_dir.join(file);
            if path.exists() {
                tracing::warn!(path = %path.display(), "sample agent exists, skipping");
                continue;
            }
            std::fs::write(path, content)?;
        }
        Ok(())
    }
}
