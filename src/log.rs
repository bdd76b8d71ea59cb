//! Initialisation and configuration of the program's logging system.
//!
//! Messages are written to stdout (info and below) and stderr (warnings and errors), coloured when
//! the output is a terminal. When an output folder is given, they are also written to log files.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The environment variable used to override the log level
pub const LOG_LEVEL_ENV_VAR: &str = "ENERGY_MIX_LOG_LEVEL";

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the
/// `ENERGY_MIX_LOG_LEVEL` environment variable or the settings.toml file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The file name for the log file containing ordinary messages
const LOG_INFO_FILE_NAME: &str = "energy_mix_info.log";

/// The file name for the log file containing warnings and error messages
const LOG_ERROR_FILE_NAME: &str = "energy_mix_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Convert a log level name (case-insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Initialise the program logger using `fern`.
///
/// The log level is taken from the `ENERGY_MIX_LOG_LEVEL` environment variable if set, otherwise
/// from the settings file. Possible values are `off`, `error`, `warn`, `info`, `debug` and
/// `trace`.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_path`: The folder in which to save log files (if Some, log files will be created)
pub fn init(log_level_from_settings: &str, log_file_path: Option<&Path>) -> Result<()> {
    let log_level = env::var(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    // Only colour output going to a terminal
    let use_colour_stdout = std::io::stdout().is_terminal();
    let use_colour_stderr = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            // Write non-error messages to stdout
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stdout, &colours);
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            // Write warnings and errors to stderr
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stderr, &colours);
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(log_file_path) = log_file_path {
        let new_log_file = |file_name| {
            let path = log_file_path.join(file_name);
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("Could not create log file {}", path.display()))
        };

        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(new_log_file(LOG_INFO_FILE_NAME)?),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(new_log_file(LOG_ERROR_FILE_NAME)?),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT.set(()).unwrap();

    Ok(())
}

/// Write a log message in the program's format
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write to the log with no colours
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write to the log with optional colours
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}
