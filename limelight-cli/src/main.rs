use clap::Parser;
use limelight_cli::commands::Commands;

/// Entity mention highlighting for chapter text and markup
#[derive(Debug, Parser)]
#[command(name = "limelight", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
