//! The module responsible for writing output data to disk.
use crate::input::YEARS_COLUMN;
use crate::mix::MixOutputs;
use crate::table::Table;
use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "energy_mix_results";

/// Get the default output folder for the model at the specified path
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory, if it doesn't already exist.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether an existing, non-empty folder may be written into
///
/// # Returns
///
/// Whether existing files may be overwritten, or an error if the folder is not empty and
/// `allow_overwrite` is false.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to overwrite."
        );
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Write a table to a CSV file, with the years as the first column
pub fn write_table(file_path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    writer.write_record(std::iter::once(YEARS_COLUMN).chain(table.column_names()))?;

    for (idx, year) in table.years().iter().enumerate() {
        let row = std::iter::once(year.to_string())
            .chain(table.iter().map(|(_, series)| series[idx].to_string()));
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write every output table to `<output_dir>/<name>.csv`
pub fn write_outputs(output_dir: &Path, outputs: &MixOutputs) -> Result<()> {
    for (name, table) in outputs.iter_tables() {
        let file_path = output_dir.join(format!("{name}.csv"));
        write_table(&file_path, table)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, axis, energy_mix, mix_inputs};
    use crate::input::read_table;
    use crate::mix::{EnergyMix, MixInputs};
    use crate::series::Series;
    use crate::year::YearAxis;
    use rstest::rstest;
    use std::fs::File;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_table_round_trip(axis: YearAxis) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("table.csv");
        let table = Table::from_columns(
            &axis,
            [
                ("electricity", Series::from([1.5, 2.0, 1e-3])),
                ("methane", Series::from([-0.25, 0.0, 1e9])),
            ],
        );

        write_table(&file_path, &table).unwrap();
        assert_eq!(read_table(&file_path).unwrap(), table);
    }

    #[rstest]
    fn test_write_outputs(energy_mix: EnergyMix, mix_inputs: MixInputs) {
        let dir = tempdir().unwrap();
        let outputs = energy_mix.compute(&mix_inputs).unwrap();
        write_outputs(dir.path(), &outputs).unwrap();

        for name in ["raw_production", "energy_mix", "ghg_emissions_CH4"] {
            assert!(dir.path().join(format!("{name}.csv")).is_file());
        }
        assert_eq!(
            read_table(&dir.path().join("net_production.csv")).unwrap(),
            outputs.net_production
        );
    }

    #[test]
    fn test_create_output_directory_new() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing() {
        let dir = tempdir().unwrap();

        // Empty folder
        assert!(!create_output_directory(dir.path(), false).unwrap());

        // Non-empty folder
        File::create(dir.path().join("file.csv")).unwrap();
        assert_error!(
            create_output_directory(dir.path(), false),
            "Output folder already exists and is not empty. Use --overwrite to overwrite."
        );
        assert!(create_output_directory(dir.path(), true).unwrap());
    }
}
