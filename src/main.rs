use clap::Parser;
use proget_contracts::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => cli::validate::run(args).await,
        Command::Normalize(args) => cli::normalize::run(args).await,
    }
}
