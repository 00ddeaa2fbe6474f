use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use typeforge_cli::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    Cli::parse().command.run()
}
