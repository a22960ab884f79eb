//! Built-in skeletons shipped with the binary.
//!
//! Each built-in is a subcommand whose long options are generated from the
//! skeleton's declared variables (`author_email` becomes `--author-email`),
//! so every variable can be preset non-interactively. The template trees
//! live under `skeletons/` next to this crate; `SKEL_SKELETONS_DIR`
//! overrides the location.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command};
use skel_core::{RenderError, Skeleton, SkeletonConfig, Var};

use crate::cmd::run::dst_arg;

pub struct Builtin {
    pub name: &'static str,
    pub command: fn() -> Command,
    pub config: fn(&ArgMatches) -> SkeletonConfig,
}

pub fn all() -> Vec<Builtin> {
    vec![
        Builtin { name: "module", command: module_command, config: module_config_from },
        Builtin {
            name: "package",
            command: package_command,
            config: package_config_from,
        },
        Builtin {
            name: "license",
            command: license_command,
            config: license_config_from,
        },
    ]
}

const LICENSE_KINDS: [&str; 4] = ["none", "bsd", "gpl", "lgpl"];

fn skeletons_root() -> PathBuf {
    std::env::var_os("SKEL_SKELETONS_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("skeletons"),
        PathBuf::from,
    )
}

fn module_config() -> SkeletonConfig {
    SkeletonConfig::new("basic-module", skeletons_root().join("basic-module"))
        .with_description("A single-file module with a readme")
        .var(Var::new("module_name"))
        .var(Var::new("author"))
        .var(Var::new("author_email"))
}

fn package_config(license: &str) -> SkeletonConfig {
    SkeletonConfig::new("basic-package", skeletons_root().join("basic-package"))
        .with_description("A package with setup file, readme and license")
        .var(Var::new("project_name"))
        .var(Var::new("package_name"))
        .var(Var::new("author"))
        .var(Var::new("author_email"))
        .require(license_config(license))
}

fn license_config(kind: &str) -> SkeletonConfig {
    let root = skeletons_root().join("licenses");
    match kind {
        "bsd" => SkeletonConfig::new("bsd", root.join("bsd"))
            .var(Var::new("author"))
            .var(Var::new("organization").with_default("").with_description(
                "required for a 3-clause BSD license - \
                 leave it empty for a 2-clause BSD license",
            ))
            .with_prepare(bsd_prepare),
        "gpl" => SkeletonConfig::new("gpl", root.join("gpl"))
            .var(Var::new("author"))
            .var(Var::new("project_name")),
        "lgpl" => SkeletonConfig::new("lgpl", root.join("lgpl"))
            .var(Var::new("author"))
            .var(Var::new("project_name")),
        _ => SkeletonConfig::new("no-license", root.join("no-license"))
            .var(Var::new("author")),
    }
}

const BSD_THIRD_CLAUSE: &str = "    - Neither the name of the {organization} nor \
the names of its\n      contributors may be used to endorse or promote products\n      \
derived from this software without specific prior written\n      permission.\n";

/// Expand the third clause when an organization was given, so the license
/// template can splice in `{third_clause}` unconditionally.
fn bsd_prepare(skel: &Skeleton) -> Result<(), RenderError> {
    if skel.store().get_or("organization", "").is_empty() {
        skel.set("third_clause", "");
    } else {
        let clause =
            skel.format(BSD_THIRD_CLAUSE).map_err(|source| RenderError::Template {
                path: PathBuf::from("<bsd third clause>"),
                source,
            })?;
        skel.set("third_clause", clause);
    }
    Ok(())
}

fn module_command() -> Command {
    let mut seen = HashSet::new();
    with_var_flags(
        Command::new("module")
            .about("Render a single-file module skeleton")
            .arg(dst_arg()),
        &module_config(),
        &mut seen,
    )
}

fn module_config_from(_matches: &ArgMatches) -> SkeletonConfig {
    module_config()
}

fn package_command() -> Command {
    let mut cmd = Command::new("package")
        .about("Render a package skeleton with a license layered on top")
        .arg(dst_arg())
        .arg(license_arg());
    // Flags for every variable any license choice could require; the
    // chosen composition only reads the ones it declares.
    let mut seen = HashSet::new();
    cmd = with_var_flags(cmd, &package_config("none"), &mut seen);
    for kind in LICENSE_KINDS {
        cmd = with_var_flags(cmd, &license_config(kind), &mut seen);
    }
    cmd
}

fn package_config_from(matches: &ArgMatches) -> SkeletonConfig {
    let kind = matches.get_one::<String>("license").expect("defaulted");
    package_config(kind)
}

fn license_command() -> Command {
    let mut cmd = Command::new("license")
        .about("Render a license skeleton on its own")
        .arg(dst_arg())
        .arg(license_arg());
    let mut seen = HashSet::new();
    for kind in LICENSE_KINDS {
        cmd = with_var_flags(cmd, &license_config(kind), &mut seen);
    }
    cmd
}

fn license_config_from(matches: &ArgMatches) -> SkeletonConfig {
    let kind = matches.get_one::<String>("license").expect("defaulted");
    license_config(kind)
}

fn license_arg() -> Arg {
    Arg::new("license")
        .long("license")
        .value_name("KIND")
        .value_parser(LICENSE_KINDS)
        .default_value("none")
        .help("License skeleton to apply")
}

fn with_var_flags(
    mut cmd: Command,
    config: &SkeletonConfig,
    seen: &mut HashSet<String>,
) -> Command {
    for var in config.variables() {
        if !seen.insert(var.name().to_string()) {
            continue;
        }
        cmd = cmd.arg(
            Arg::new(var.name().to_string())
                .long(var.name().replace('_', "-"))
                .value_name("VALUE")
                .help(var.full_description()),
        );
    }
    for req in config.required() {
        cmd = with_var_flags(cmd, req, seen);
    }
    cmd
}
