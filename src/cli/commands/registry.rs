//! Registry command implementation

use crate::cli::utils;
use crate::report::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::{ArgMatches, Command};
use manifest_registry::RegistryLoader;
use tracing::info;

pub fn command() -> Command {
    Command::new("registry")
        .about("List known entities and their properties")
        .arg(utils::format_arg())
        .args(utils::config_args())
}

pub fn run(matches: &ArgMatches) -> Result<u8> {
    let config = utils::load_config(matches)?;
    config.validate()?;
    let format = utils::output_format(matches)?;

    let registry_dir = config.registry_dir()?;
    info!("Loading entity registry from {:?}", registry_dir);
    let registry = RegistryLoader::new(config.registry.loader_options())
        .load(&registry_dir)
        .with_context(|| format!("Failed to load entity registry from {:?}", registry_dir))?;

    match format {
        OutputFormat::Text => print!("{}", report::render_registry(&registry)),
        OutputFormat::Json => print!("{}", report::render_json(&registry)?),
    }

    Ok(0)
}
