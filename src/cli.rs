//! The command line interface for the energy mix.
use crate::id::StreamID;
use crate::input::{list_stream_dirs, load_model};
use crate::log;
use crate::mix::EnergyMix;
use crate::output::{create_output_directory, get_output_dir, write_outputs};
use crate::settings::Settings;
use crate::units::UnitTable;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// The command line interface for the energy mix.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Commands,
}

/// Options for the run command
#[derive(Args)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compute the energy mix for a model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a model.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
        }
    }
}

/// Parse CLI arguments and execute the requested command
pub fn run_cli() -> Result<()> {
    Cli::parse().command.execute()
}

/// Load program settings, if not provided
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(model_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    let (parameters, inputs) = load_model(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let mix = EnergyMix::new(&parameters, &UnitTable::default())?;
    let outputs = mix.compute(&inputs)?;
    write_outputs(output_path, &outputs)?;
    info!("Energy mix complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // Log files are not saved when validating
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let (parameters, _) = load_model(model_path).context("Failed to validate model.")?;
    EnergyMix::new(&parameters, &UnitTable::default()).context("Failed to validate model.")?;

    let unused = unused_stream_dirs(model_path, &parameters.energy_list)?;
    if !unused.is_empty() {
        warn!(
            "The following stream folders are not in `energy_list` and will be ignored: {}",
            unused.iter().join(", ")
        );
    }

    info!("Model validation successful!");

    Ok(())
}

/// Stream folders in the model directory which no configured stream refers to
fn unused_stream_dirs(model_path: &Path, energy_list: &[StreamID]) -> Result<Vec<StreamID>> {
    let unused = list_stream_dirs(model_path)?
        .into_iter()
        .filter(|stream| !energy_list.contains(stream))
        .collect();

    Ok(unused)
}
