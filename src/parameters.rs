//! Defines the `MixParameters` struct, which represents the contents of `mix.toml`.
use crate::id::{IDCollection, StreamID};
use crate::input::{input_err_msg, read_toml};
use crate::mix::production::HEAT_LOSSES_COLUMN;
use crate::table::TOTAL_COLUMN;
use crate::units::DeclaredUnits;
use crate::year::YearAxis;
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::path::Path;

const MIX_PARAMETERS_FILE_NAME: &str = "mix.toml";

/// Represents the contents of the entire mix file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MixParameters {
    /// First year of the year axis
    pub year_start: u32,
    /// Last year of the year axis (inclusive)
    pub year_end: u32,
    /// The streams to aggregate, in order
    pub energy_list: Vec<StreamID>,
    /// Percentage of total raw production lost as heat
    #[serde(default)]
    pub heat_losses_percentage: f64,
    /// Streams modelled with a single raw-to-net production factor
    #[serde(default)]
    pub coarse_streams: IndexMap<StreamID, f64>,
    /// Declared input and output units of every category of data
    #[serde(default)]
    pub units: DeclaredUnits,
}

/// Check that the `energy_list` parameter is valid
fn check_energy_list(energy_list: &[StreamID]) -> Result<IndexSet<StreamID>> {
    ensure!(!energy_list.is_empty(), "`energy_list` is empty");

    let streams: IndexSet<_> = energy_list.iter().cloned().collect();
    ensure!(
        streams.len() == energy_list.len(),
        "`energy_list` must be composed of unique stream names"
    );

    // These names are taken by synthetic columns of the production tables
    for reserved in [TOTAL_COLUMN, HEAT_LOSSES_COLUMN] {
        ensure!(
            !streams.contains(reserved),
            "`{reserved}` cannot be used as a stream name"
        );
    }

    Ok(streams)
}

/// Check that the `heat_losses_percentage` parameter is valid
fn check_heat_losses_percentage(value: f64) -> Result<()> {
    ensure!(
        (0.0..=100.0).contains(&value),
        "`heat_losses_percentage` must be between 0 and 100"
    );

    Ok(())
}

/// Check that the `coarse_streams` parameter is valid
fn check_coarse_streams(
    coarse_streams: &IndexMap<StreamID, f64>,
    streams: &IndexSet<StreamID>,
) -> Result<()> {
    for (stream, factor) in coarse_streams {
        streams
            .get_id_by_str(stream.as_str())
            .context("Coarse streams must be in `energy_list`")?;
        ensure!(
            (0.0..=1.0).contains(factor),
            "Raw-to-net production factor for {stream} must be between 0 and 1"
        );
    }

    Ok(())
}

impl MixParameters {
    /// Read a mix file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The mix file contents as a [`MixParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<MixParameters> {
        let file_path = model_dir.as_ref().join(MIX_PARAMETERS_FILE_NAME);
        let params: MixParameters = read_toml(&file_path)?;

        params
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(params)
    }

    /// Validate parameters after reading in file
    pub fn validate(&self) -> Result<()> {
        self.year_axis()?;
        let streams = check_energy_list(&self.energy_list)?;
        check_heat_losses_percentage(self.heat_losses_percentage)?;
        check_coarse_streams(&self.coarse_streams, &streams)?;

        Ok(())
    }

    /// The year axis defined by `year_start` and `year_end`
    pub fn year_axis(&self) -> Result<YearAxis> {
        YearAxis::new(self.year_start, self.year_end)
    }
}
