//! Render a skeleton directory described by its `skeleton.yaml`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use skel_core::manifest;
use tracing::warn;

use super::run::{dst_arg, execute};

pub fn command() -> Command {
    Command::new("apply")
        .about("Render a skeleton directory described by its skeleton.yaml")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Skeleton source directory containing skeleton.yaml"),
        )
        .arg(dst_arg())
        .arg(
            Arg::new("var")
                .long("var")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Preset a variable, repeatable"),
        )
}

pub fn run(matches: &ArgMatches) -> ExitCode {
    let source = matches.get_one::<PathBuf>("source").expect("required");

    let config = match manifest::load(source) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("FAIL skel apply");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let values = parse_var_args(
        matches.get_many::<String>("var").unwrap_or_default().map(String::as_str),
    );
    execute(config, values, matches)
}

/// Split repeated `--var key=value` pairs; malformed entries are dropped
/// with a warning.
fn parse_var_args<'a>(args: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            values.insert(key.to_string(), value.to_string());
        } else {
            warn!("ignoring malformed --var '{}': expected KEY=VALUE", arg);
        }
    }
    values
}
