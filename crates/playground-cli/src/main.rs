//! SWC playground CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use playground_cli::logging::{LogConfig, LogFormat, init_logging};
use playground_cli::settings::load_settings;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    Runtime, run_config, run_open, run_parse, run_report, run_schema, run_share,
    run_strip_types, run_transform, run_versions,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let runtime = Runtime {
        settings: load_settings(cli.settings.as_deref()).with_env(),
        swc_version: cli.swc_version.clone(),
    };

    let result = match cli.command {
        Command::Transform(args) => run_transform(&runtime, &args).await,
        Command::Parse(args) => run_parse(&runtime, &args).await,
        Command::StripTypes(args) => run_strip_types(&runtime, &args).await,
        Command::Share(args) => run_share(&runtime, &args),
        Command::Open(args) => run_open(&runtime, &args).await,
        Command::Report(args) => run_report(&runtime, &args),
        Command::Versions(args) => run_versions(&runtime, &args).await,
        Command::Schema => run_schema(),
        Command::Config(args) => run_config(&runtime, args.command),
    };
    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
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
