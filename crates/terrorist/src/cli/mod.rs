pub mod setup;

use std::{ffi::OsString, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};
use terrorist_core::{load_config, load_config_from, Dispatcher, Registry};

use crate::builtins::{self, Catalog};

pub fn build_cli() -> Command {
    Command::new("terrorist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run registered commands by name")
        .long_about(
            "Run registered commands by name.\n\n\
             Everything after COMMAND is passed to it verbatim: bare tokens are \
             positional arguments, `--name [value]` sets a flag.\n\
             Without a COMMAND, all commands are listed.",
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Config file to use instead of ~/.terrorist.toml"),
        )
        .disable_help_subcommand(true)
        .allow_external_subcommands(true)
        .external_subcommand_value_parser(value_parser!(String))
        .subcommand_value_name("COMMAND")
}

/// Parse `args` and run the requested command from `registry`.
///
/// The builtins are added to `registry` first, so embedders only register
/// their own commands.
///
/// # Errors
///
/// Returns an error if the arguments do not parse, the config cannot be
/// loaded, registration fails, or the command fails.
pub fn run_with<I, T>(registry: Registry, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(args)?;
    execute(registry, &matches)
}

/// Run the command selected by already-parsed `matches`.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, registration fails, or
/// the command fails.
pub fn execute(mut registry: Registry, matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let catalog = Arc::new(Catalog::default());
    builtins::register(&mut registry, &catalog)?;
    catalog.freeze(&registry, &config);

    let dispatcher = Dispatcher::new(&registry, config);
    tracing::debug!(
        commands = dispatcher.registry().len(),
        short_names = dispatcher.config().short_name_resolution(),
        "dispatcher ready"
    );

    match matches.subcommand() {
        Some((name, sub_m)) => {
            let raw_args: Vec<&String> = sub_m
                .get_many::<String>("")
                .map(Iterator::collect)
                .unwrap_or_default();
            tracing::debug!(command = name, args = raw_args.len(), "dispatching");
            dispatcher.run(name, &raw_args)?;
        }
        None => dispatcher.run::<&str>(builtins::LIST, &[])?,
    }

    Ok(())
}
