//! Shared render execution behind every subcommand.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgMatches};
use skel_core::{RenderError, Skeleton, SkeletonConfig};
use tracing::debug;

use crate::prompt::TerminalPrompt;

pub fn dst_arg() -> Arg {
    Arg::new("dst_dir")
        .value_name("DST_DIR")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Destination directory to render into")
}

/// Build the skeleton, complete its variables (interactively unless batch
/// mode applies) and render it.
pub fn execute(
    config: SkeletonConfig,
    values: HashMap<String, String>,
    matches: &ArgMatches,
) -> ExitCode {
    let dst = matches.get_one::<PathBuf>("dst_dir").expect("required").clone();
    let dry = matches.get_flag("dry-run");
    let batch = matches.get_flag("batch") || !std::io::stdin().is_terminal();

    let name = config.name().to_string();
    let skel = Skeleton::with_values(config, values);

    let result = if batch {
        debug!("batch mode: missing variables fail instead of prompting");
        skel.write(&dst, dry)
    } else {
        skel.run(&dst, dry, &mut TerminalPrompt::new())
    };

    match result {
        Ok(()) => {
            println!("OK   skel {name}");
            println!("dest: {}", dst.display());
            if dry {
                println!("dry-run: nothing was written");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("FAIL skel {name}");
            eprintln!("{err}");
            if batch {
                if let RenderError::MissingVariable { ref variable, .. } = err {
                    eprintln!(
                        "  hint: pass --{} or drop --batch",
                        variable.replace('_', "-")
                    );
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Read the per-variable long options of the whole composition.
pub fn values_from_flags(
    config: &SkeletonConfig,
    matches: &ArgMatches,
) -> HashMap<String, String> {
    let mut values = HashMap::new();
    collect(config, matches, &mut values);
    values
}

fn collect(
    config: &SkeletonConfig,
    matches: &ArgMatches,
    values: &mut HashMap<String, String>,
) {
    for var in config.variables() {
        if let Some(value) = matches.get_one::<String>(var.name()) {
            values.insert(var.name().to_string(), value.clone());
        }
    }
    for req in config.required() {
        collect(req, matches, values);
    }
}
