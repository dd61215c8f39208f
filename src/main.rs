use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use sb::commands;

fn build_cli() -> Command {
    Command::new("sb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Concurrent status bar for dwm-like window managers")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable debug logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (defaults to ~/.config/sb/config.toml)")
                .global(true),
        )
        .arg(
            Arg::new("sink")
                .short('s')
                .long("sink")
                .value_name("SINK")
                .help("Where to render the status")
                .value_parser(["x11", "stdout"])
                .global(true),
        )
        .subcommand(Command::new("run").about("Run the status bar daemon (default)"))
        .subcommand(
            Command::new("once")
                .about("Poll every enabled block once and print the status")
                .arg(
                    Arg::new("plain")
                        .long("plain")
                        .help("Strip color markers from the output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list").about("List blocks, their signals and whether they are enabled"))
        .subcommand(
            Command::new("trigger")
                .about("Refresh one block in running instances")
                .arg(
                    Arg::new("name")
                        .help("Block name (see 'sb list')")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("reload").about("Make running instances re-read their configuration"))
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    sb::init_logging(matches.get_flag("verbose"));

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run(sub_matches),
        Some(("once", sub_matches)) => commands::once(sub_matches),
        Some(("list", sub_matches)) => commands::list(sub_matches),
        Some(("trigger", sub_matches)) => commands::trigger(sub_matches),
        Some(("reload", sub_matches)) => commands::reload(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => commands::run(&matches),
    }
}
