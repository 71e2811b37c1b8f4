//! CLI command implementations

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use limelight_api::MentionType;
use limelight_engine::classify::{get_rule_set, list_rule_sets};

pub mod generate_rules;
pub mod render;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render chapters with entity mention highlights
    Render(render::RenderArgs),

    /// Validate a block rule file
    ValidateRules(validate::ValidateArgs),

    /// Write a block rule template
    GenerateRules(generate_rules::GenerateRulesArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ListCommands {
    /// List embedded block rule sets
    RuleSets,

    /// List input modes
    Modes,

    /// List output formats
    Formats,

    /// List mention types
    MentionTypes,
}

impl Commands {
    /// Run the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Render(args) => args.execute(),
            Commands::ValidateRules(args) => args.execute(),
            Commands::GenerateRules(args) => args.execute(),
            Commands::List { subcommand } => {
                for line in subcommand.lines() {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Lines printed for this listing
    pub fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::RuleSets => {
                let mut lines = vec!["Embedded rule sets:".to_string()];
                for name in list_rule_sets() {
                    let Some(set) = get_rule_set(name) else {
                        continue;
                    };
                    let labels: Vec<&str> = set.rules.iter().map(|r| r.label.as_str()).collect();
                    lines.push(format!("  {name:<10} {}", set.metadata.description));
                    if !labels.is_empty() {
                        lines.push(format!("  {:<10} labels: {}", "", labels.join(", ")));
                    }
                }
                lines
            }
            ListCommands::Modes => describe("Input modes:", render::Mode::value_variants()),
            ListCommands::Formats => {
                describe("Output formats:", render::OutputFormat::value_variants())
            }
            ListCommands::MentionTypes => {
                let mut lines = vec!["Mention types:".to_string()];
                lines.extend(MentionType::ALL.iter().map(|kind| format!("  {kind}")));
                lines
            }
        }
    }
}

fn describe<T: ValueEnum>(title: &str, variants: &[T]) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    for variant in variants {
        if let Some(value) = variant.to_possible_value() {
            let help = value.get_help().map(|h| h.to_string()).unwrap_or_default();
            lines.push(format!("  {:<10} - {help}", value.get_name()));
        }
    }
    lines
}
