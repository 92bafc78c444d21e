use clap::{Parser, Subcommand};

use crate::global_settings::GlobalSettings;

mod output;
mod resolve;
mod unify;

pub fn exec(settings: &GlobalSettings) -> miette::Result<()> {
    use Command::*;
    let cli = Cli::parse();
    match cli.command {
        Match(args) => resolve::exec(args, settings),
        Unify(args) => unify::exec(args, settings),
    }
}

#[derive(Parser)]
#[clap(version, author, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the template instantiations described in a case file
    Match(resolve::Args),
    /// Unify the expressions and patterns described in a case file
    Unify(unify::Args),
}
