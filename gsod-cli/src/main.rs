//! GSOD CLI - Command line tool for exploring daily weather station summaries.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gsod-cli",
    version,
    about = "Explore GSOD daily weather observations by station"
)]
struct Cli {
    #[command(subcommand)]
    command: gsod_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    gsod_cmd::run(cli.command)
}
