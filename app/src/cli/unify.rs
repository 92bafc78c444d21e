use std::path::PathBuf;

use optimizer::{IdentifierGenerator, show_bindings, unify_exprs};
use unifier::Outcome;

use crate::case::{self, Unification, UnifyCase};
use crate::global_settings::GlobalSettings;

use super::output::Output;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> miette::Result<()> {
    let case: UnifyCase = case::load(&cmd.filepath)?;
    let Unification { exprs, patterns, locals } = case.lower();

    let mut ids = IdentifierGenerator::new();
    let outcome = unify_exprs(
        &exprs,
        &locals,
        &patterns,
        &case.expr_variables,
        &case.pattern_variables,
        &mut ids,
    )
    .map_err(|err| miette::Report::new(*err))?;

    let mut out = Output::stdout(settings.colorize);
    match outcome {
        Outcome::Certain(bindings) => out.text(&format!("Certain {}", show_bindings(&bindings)))?,
        Outcome::Possible => out.text("Possible")?,
        Outcome::Impossible => out.text("Impossible")?,
    }
    out.newline()?;
    Ok(())
}
