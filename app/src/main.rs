mod case;
mod cli;
mod global_settings;
mod result;

use global_settings::GlobalSettings;

fn main() -> miette::Result<()> {
    let settings = GlobalSettings::from_env();
    env_logger::builder()
        .filter_level(settings.log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
    cli::exec(&settings)
}
