//! HeartAlert CLI.

use clap::{ColorChoice, Parser};
use heart_cli::assess::load_pipeline;
use heart_cli::logging::{LogConfig, LogFormat, init_logging};
use heart_core::UnmatchedKeyPolicy;
use std::io::{self, IsTerminal};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_analyze, run_chat, run_doctor, run_schema};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let policy = match &cli.command {
        Command::Analyze(args) if args.strict_columns => UnmatchedKeyPolicy::Reject,
        _ => UnmatchedKeyPolicy::default(),
    };
    let (registry, summary, pipeline) = match load_pipeline(&cli.artifacts, policy) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(error = %err, "artifact verification failed");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Command::Analyze(args) => run_analyze(args, &pipeline),
        Command::Chat => run_chat(),
        Command::Schema => run_schema(&registry),
        Command::Doctor => run_doctor(&registry, &summary),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        log_data: cli.log_data,
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
