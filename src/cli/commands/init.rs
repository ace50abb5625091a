//! Init command implementation

use crate::config::DEFAULT_CONFIG_FILES;
use crate::Config;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Write a configuration file with the default settings")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(DEFAULT_CONFIG_FILES[0]),
        )
        .arg(
            clap::Arg::new("force")
                .long("force")
                .help("Overwrite an existing file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn run(matches: &ArgMatches) -> Result<u8> {
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing output path"))?;

    if output_path.exists() && !matches.get_flag("force") {
        return Err(anyhow!(
            "{:?} already exists, use --force to overwrite it",
            output_path
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);
    Config::default().save_to_file(&output_path)?;

    println!("Configuration file created: {}", output_path.display());
    println!("Edit the plugins, registry and quarantine sections to match your repository.");

    Ok(0)
}
