//! visor-costos CLI.

use clap::{ColorChoice, Parser};
use costos_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_clear, run_export, run_import, run_import_snapshot, run_resumen, run_status,
};
use crate::summary::{print_import, print_resumen, print_status};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Import(args) => match run_import(&cli.db, args) {
            Ok(result) => {
                print_import(&result);
                0
            }
            Err(error) => report(&error),
        },
        Command::Status => match run_status(&cli.db) {
            Ok(result) => {
                print_status(&result);
                0
            }
            Err(error) => report(&error),
        },
        Command::Resumen(args) => match run_resumen(&cli.db, args) {
            Ok(result) => {
                print_resumen(&result);
                0
            }
            Err(error) => report(&error),
        },
        Command::Export(args) => match run_export(&cli.db, args) {
            Ok((rows, sources)) => {
                println!(
                    "Exported {rows} rows and {sources} source records to {}.",
                    args.path.display()
                );
                0
            }
            Err(error) => report(&error),
        },
        Command::ImportSnapshot(args) => match run_import_snapshot(&cli.db, args) {
            Ok(result) => {
                print_import(&result);
                0
            }
            Err(error) => report(&error),
        },
        Command::Clear(args) => match run_clear(&cli.db, args) {
            Ok(removed) => {
                println!("Vault cleared ({removed} rows removed).");
                0
            }
            Err(error) => report(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
