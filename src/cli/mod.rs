//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("manifest-lint")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Validate plugin manifests against a shared entity registry")
            .long_about(
                "Validate plugin manifests against a shared entity registry.\n\n\
                 Without a subcommand, runs `validate` with the given arguments.",
            )
            .subcommand_negates_reqs(true)
            .args_conflicts_with_subcommands(true)
            .args(commands::validate::args())
            .subcommand(commands::validate::command())
            .subcommand(commands::patterns::command())
            .subcommand(commands::registry::command())
            .subcommand(commands::init::command())
    }

    /// Run the CLI application, returning the process exit code
    pub fn run(matches: &ArgMatches) -> Result<u8> {
        match matches.subcommand() {
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches),
            Some(("patterns", sub_matches)) => commands::patterns::run(sub_matches),
            Some(("registry", sub_matches)) => commands::registry::run(sub_matches),
            Some(("init", sub_matches)) => commands::init::run(sub_matches),
            // No subcommand: the top-level arguments are validate's
            _ => commands::validate::run(matches),
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use clap::{Arg, ArgAction, ArgMatches};
    use std::path::PathBuf;
    use tracing::{debug, info};

    use crate::{Config, OutputFormat, Selection};

    /// `--config` and `--root`, shared by every command that loads the repo
    pub fn config_args() -> [Arg; 2] {
        [
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
            Arg::new("root")
                .short('r')
                .long("root")
                .help("Repository root (default: current directory)")
                .value_name("DIR"),
        ]
    }

    pub fn format_arg() -> Arg {
        Arg::new("format")
            .long("format")
            .help("Output format")
            .value_name("FORMAT")
            .value_parser(["text", "json"])
            .default_value("text")
    }

    /// Positional plugin paths plus `--all` and `--filter`
    pub fn selection_args() -> [Arg; 3] {
        [
            Arg::new("plugins")
                .help("Plugin paths below the plugins directory (e.g. tasks/todoist)")
                .value_name("PLUGIN")
                .num_args(0..)
                .action(ArgAction::Append),
            Arg::new("all")
                .long("all")
                .help("Validate every plugin (the default without plugin paths)")
                .action(ArgAction::SetTrue)
                .conflicts_with("plugins"),
            Arg::new("filter")
                .short('f')
                .long("filter")
                .help("Only plugins whose name or path contains this text")
                .value_name("TEXT"),
        ]
    }

    /// Load the configuration named by `--config`, else the first default
    /// configuration file in the root, else built-in defaults
    pub fn load_config(matches: &ArgMatches) -> Result<Config> {
        let root = matches.get_one::<String>("root").map(PathBuf::from);

        let mut config = match matches.get_one::<String>("config") {
            Some(path) => Config::from_file(&PathBuf::from(path))?,
            None => {
                let dir = root.clone().unwrap_or_else(|| PathBuf::from("."));
                match Config::find_in(&dir) {
                    Some(path) => {
                        info!("Using configuration file {:?}", path);
                        Config::from_file(&path)?
                    }
                    None => {
                        debug!("No configuration file in {:?}, using defaults", dir);
                        Config {
                            root: dir,
                            ..Config::default()
                        }
                    }
                }
            }
        };

        if let Some(root) = root {
            config.root = root;
        }

        Ok(config)
    }

    pub fn selection(matches: &ArgMatches) -> Selection {
        let names: Vec<String> = matches
            .get_many::<String>("plugins")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let selection = Selection::named(names);
        match matches.get_one::<String>("filter") {
            Some(filter) => selection.with_filter(filter.clone()),
            None => selection,
        }
    }

    pub fn output_format(matches: &ArgMatches) -> Result<OutputFormat> {
        matches
            .get_one::<String>("format")
            .map(|format| format.parse())
            .unwrap_or(Ok(OutputFormat::Text))
    }
}
