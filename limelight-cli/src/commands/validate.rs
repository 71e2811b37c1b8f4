//! Validate-rules command implementation

use anyhow::Result;
use clap::Args;
use limelight_engine::BlockClassifier;
use std::path::PathBuf;

/// Arguments for the validate-rules command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the block rule file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub rules: PathBuf,

    /// Classify these sample lines with the rules
    #[arg(short, long, value_name = "TEXT")]
    pub sample: Vec<String>,
}

impl ValidateArgs {
    /// Execute the validate-rules command
    pub fn execute(&self) -> Result<()> {
        println!("Validating block rules: {}", self.rules.display());

        let classifier = match BlockClassifier::from_file(&self.rules) {
            Ok(classifier) => classifier,
            Err(e) => {
                println!("✗ Rule set is invalid!");
                println!("  Error: {e}");
                return Err(anyhow::anyhow!("Validation failed: {}", e));
            }
        };

        println!("✓ Rule set is valid!");
        println!("  Name: {}", classifier.name());
        println!("  Generic label: {}", classifier.generic_label());
        println!("  Rules: {}", classifier.rules().len());
        for rule in classifier.rules() {
            println!("    - {}", rule.label());
        }

        for sample in &self.sample {
            println!("  {:?} -> {}", sample, classifier.classify(sample));
        }
        Ok(())
    }
}
