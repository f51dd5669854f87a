use clap::Parser;
use stegano_shadow_core::ShadowError;

mod cli;
mod commands;

use cli::*;

pub type CliResult<T> = Result<T, ShadowError>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    match args.command {
        Commands::Distribute(args) => args.run(),
        Commands::Recover(args) => args.run(),
    }
}
