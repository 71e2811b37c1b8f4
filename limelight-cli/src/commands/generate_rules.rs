//! Generate rules command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

const TEMPLATE: &str = r#"# Block rule set
#
# Blocks (p, div, blockquote, li) are labelled by the first rule whose
# pattern matches their trimmed text. Unmatched blocks get generic_label.
# Patterns use Rust regex syntax; single-quoted TOML strings keep
# backslashes literal.

[metadata]
name = @NAME@
description = "Custom block rules"
generic_label = "narrative"

[[rules]]
label = "level_up"
pattern = '(?i)^\s*[\[<{]?\s*level\s+up\b'
description = "Level gain announcements"

[[rules]]
label = "skill"
pattern = '(?i)^\s*[\[<{]\s*(new\s+)?skill\s+(acquired|learned|unlocked)\b'
description = "Skill acquisition"

# Add more rules as needed:
# [[rules]]
# label = "letter"
# pattern = '^(Dear|To)\s+\w+,$'
# description = "In-story letters"
"#;

/// Arguments for the generate-rules command
#[derive(Debug, Args)]
pub struct GenerateRulesArgs {
    /// Name of the new rule set
    #[arg(short, long, value_name = "NAME", required = true)]
    pub name: String,

    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateRulesArgs {
    /// Execute the generate-rules command
    pub fn execute(&self) -> Result<()> {
        println!("Generating block rule template...");
        println!("  Rule set name: {}", self.name);
        println!("  Output file: {}", self.output.display());

        std::fs::write(&self.output, self.generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Rule template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the patterns to match your book's notifications");
        println!("2. Validate your rules:");
        println!("   limelight validate-rules -c {}", self.output.display());
        println!("3. Use them for rendering:");
        println!(
            "   limelight render -i chapter.xhtml --rules {}",
            self.output.display()
        );

        Ok(())
    }

    /// Template content with the rule set name filled in
    fn generate_template(&self) -> String {
        let name = toml::Value::String(self.name.clone()).to_string();
        TEMPLATE.replace("@NAME@", &name)
    }
}
