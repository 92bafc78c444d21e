use std::path::PathBuf;

use optimizer::{CompilerSession, OptimizerConfig, Resolution, show_bindings};

use crate::case::{self, Instantiation, MatchCase};
use crate::global_settings::GlobalSettings;

use super::output::Output;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// Give up after resolving this many instantiations
    #[clap(long)]
    max_steps: Option<usize>,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> miette::Result<()> {
    let case: MatchCase = case::load(&cmd.filepath)?;
    let (templates, instantiations) = case.lower()?;

    let config = OptimizerConfig { max_steps: cmd.max_steps.or(case.max_steps) };
    let mut session = CompilerSession::new(config);
    for template in templates {
        session.add_template(template);
    }

    let mut out = Output::stdout(settings.colorize);
    for Instantiation { instantiation, locals, result } in &instantiations {
        let resolution = session
            .resolve_instantiation(instantiation, locals, result)
            .map_err(|err| miette::Report::new(*err))?;

        out.print(instantiation)?;
        out.text(&format!("::{result}"))?;
        match resolution {
            Resolution::Constant(expr) => {
                out.text(" = ")?;
                out.print(&expr)?;
            }
            Resolution::Inline(candidate) => {
                out.text(" selects ")?;
                match &candidate.specialization.patterns {
                    Some(patterns) => {
                        out.text(instantiation.template_name().unwrap_or_default())?;
                        out.text("<")?;
                        out.comma_separated(patterns)?;
                        out.text(">")?;
                    }
                    None => out.text("the main definition")?,
                }
                out.text(&format!(" with {}", show_bindings(&candidate.bindings)))?;
            }
            Resolution::CannotDecide(reason) => {
                out.text(&format!(": cannot decide, {reason}"))?;
            }
        }
        out.newline()?;
    }
    log::info!("Resolved {} instantiations in {} steps", instantiations.len(), session.steps_taken());
    Ok(())
}
