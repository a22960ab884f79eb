mod builtins;
mod cmd;
mod logging;
mod prompt;

use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};

fn cli() -> Command {
    let mut root = Command::new("skel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render project skeletons: template trees with variable substitution")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log progress (-v) or debug detail (-vv)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Silence all logging"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Validate and log the render without writing anything"),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Never prompt; missing variables fail instead"),
        );

    for builtin in builtins::all() {
        root = root.subcommand((builtin.command)());
    }
    root.subcommand(cmd::apply::command())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    logging::init(matches.get_count("verbose"), matches.get_flag("quiet"));

    let (name, sub) = matches.subcommand().expect("subcommand required");
    if name == "apply" {
        return cmd::apply::run(sub);
    }

    let builtin = builtins::all()
        .into_iter()
        .find(|builtin| builtin.name == name)
        .expect("known subcommand");
    let config = (builtin.config)(sub);
    let values = cmd::run::values_from_flags(&config, sub);
    cmd::run::execute(config, values, sub)
}
