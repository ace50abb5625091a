//! Validate command implementation

use crate::cli::utils;
use crate::report::{self, OutputFormat};
use crate::{CheckOptions, ManifestLint, RunOptions};
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate plugin manifests and quarantine failing plugins")
        .args(args())
}

/// Arguments of the validate command, also accepted by the bare binary
pub fn args() -> Vec<Arg> {
    let mut args: Vec<Arg> = utils::selection_args().into();
    args.extend([
        Arg::new("no-move")
            .long("no-move")
            .help("Report failures without moving plugins to quarantine")
            .action(ArgAction::SetTrue),
        Arg::new("pre-commit")
            .long("pre-commit")
            .help("Fast checks only: parse, schema, references, mappings and expressions; never moves plugins")
            .action(ArgAction::SetTrue),
        Arg::new("no-coverage")
            .long("no-coverage")
            .help("Skip the test coverage and icon checks")
            .action(ArgAction::SetTrue),
        Arg::new("no-refs")
            .long("no-refs")
            .help("Skip return type and mapping key checks")
            .action(ArgAction::SetTrue),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Print the loaded entity registry")
            .action(ArgAction::SetTrue),
        utils::format_arg(),
    ]);
    args.extend(utils::config_args());
    args
}

/// Translate flags into run options
pub fn run_options(matches: &ArgMatches) -> RunOptions {
    let mut options = if matches.get_flag("pre-commit") {
        RunOptions::pre_commit()
    } else {
        RunOptions::default()
    };

    if matches.get_flag("no-move") {
        options.quarantine = false;
    }

    if matches.get_flag("no-coverage") {
        options.checks = CheckOptions {
            coverage: false,
            icon: false,
            ..options.checks
        };
    }

    if matches.get_flag("no-refs") {
        options.checks.references = false;
    }

    options
}

pub fn run(matches: &ArgMatches) -> Result<u8> {
    let config = utils::load_config(matches)?;
    let format = utils::output_format(matches)?;
    let options = run_options(matches);

    info!("Validating plugins with {:?}", options);
    let app = ManifestLint::new(config)?;

    if matches.get_flag("verbose") && format == OutputFormat::Text {
        print!("{}", report::render_registry(app.registry()));
        println!();
    }

    let result = app.run(&utils::selection(matches), &options)?;

    match format {
        OutputFormat::Text => print!("{}", report::render_text(&result)),
        OutputFormat::Json => print!("{}", report::render_json(&result)?),
    }

    Ok(result.exit_code())
}
