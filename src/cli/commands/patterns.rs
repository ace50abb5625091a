//! Patterns command implementation

use crate::cli::utils;
use crate::report::{self, OutputFormat};
use crate::ManifestLint;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn command() -> Command {
    Command::new("patterns")
        .about("Audit mappings for typed references and display fields")
        .args(utils::selection_args())
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with code 2 when only warnings are found")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also list the typed references found")
                .action(ArgAction::SetTrue),
        )
        .arg(utils::format_arg())
        .args(utils::config_args())
}

pub fn run(matches: &ArgMatches) -> Result<u8> {
    let config = utils::load_config(matches)?;
    let format = utils::output_format(matches)?;
    let app = ManifestLint::new(config)?;

    let result = app.audit_patterns(&utils::selection(matches))?;

    match format {
        OutputFormat::Text => print!(
            "{}",
            report::render_patterns(&result, matches.get_flag("verbose"))
        ),
        OutputFormat::Json => print!("{}", report::render_json(&result)?),
    }

    Ok(result.exit_code(matches.get_flag("strict")))
}
