// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use readerkit_config::{Config, ConfigManager};
use std::io::Write;
use std::path::PathBuf;

mod commands;

fn build_cli() -> Command {
    Command::new("readerkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse syndication feeds and sanitize their article markup")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.toml (defaults to the platform config directory)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output, repeat for more")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a feed file and print its articles as JSON")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("FILE")
                        .help("Feed document to parse"),
                )
                .arg(
                    Arg::new("origin")
                        .short('o')
                        .long("origin")
                        .value_name("URL")
                        .help("Address the feed was fetched from (defaults to a file:// address)"),
                )
                .arg(
                    Arg::new("encoding")
                        .short('e')
                        .long("encoding")
                        .value_name("LABEL")
                        .help("Character encoding declared by the transport"),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Skip the sanitization pass")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("sanitize")
                .about("Sanitize an HTML fragment and print the result")
                .arg(Arg::new("file").required(true).value_name("FILE").help("Markup to sanitize"))
                .arg(
                    Arg::new("base")
                        .short('b')
                        .long("base")
                        .value_name("URL")
                        .required(true)
                        .help("Address relative references resolve against"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(
                    Command::new("init").about("Write a default config file if none exists"),
                )
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<String>("config") {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir))
            .with_context(|| format!("Failed to use config directory {}", dir)),
        None => ConfigManager::new().context("Failed to locate config directory"),
    }
}

fn init_logging(config: &Config, verbosity: u8) {
    let level = (0..verbosity).fold(config.app.log_level, |level, _| level.more_verbose());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .init();
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;
    let config = manager
        .load_with_env_overrides()
        .unwrap_or_else(|e| {
            eprintln!("Config error: {}, using defaults", e);
            Config::default()
        });

    init_logging(&config, matches.get_count("verbose"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match matches.subcommand() {
        Some(("parse", sub_matches)) => commands::parse_feed(&config, sub_matches, &mut out),
        Some(("sanitize", sub_matches)) => commands::sanitize_file(&config, sub_matches, &mut out),
        Some(("config", sub_matches)) => match sub_matches.subcommand() {
            Some(("init", _)) => commands::config_init(&manager, &mut out),
            Some(("show", _)) => commands::config_show(&config, &mut out),
            Some(("path", _)) => commands::config_path(&manager, &mut out),
            _ => anyhow::bail!("Missing config subcommand"),
        },
        _ => {
            build_cli().print_help()?;
            writeln!(out)?;
            Ok(())
        }
    }
}
