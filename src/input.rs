//! Common routines for handling input data.
use crate::id::StreamID;
use crate::mix::MixInputs;
use crate::parameters::MixParameters;
use crate::series::Series;
use crate::stream::StreamInputs;
use crate::table::Table;
use crate::year::YearAxis;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// The name of the column holding years in every CSV file
pub const YEARS_COLUMN: &str = "years";

/// The name of the folder holding one sub-folder of tables per stream
const STREAMS_DIR_NAME: &str = "streams";

const TARGET_PRODUCTION_FILE_NAME: &str = "target_production.csv";

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read a table of year-indexed columns from CSV data.
///
/// The first column must be [`YEARS_COLUMN`]; every other column holds one series.
fn read_table_from_reader<R: std::io::Read>(reader: R) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    ensure!(
        headers.get(0) == Some(YEARS_COLUMN),
        "First column must be '{YEARS_COLUMN}'"
    );

    let num_columns = headers.len() - 1;
    let mut years = Vec::new();
    let mut values = vec![Vec::new(); num_columns];
    for record in reader.records() {
        let record = record?;
        let year = record[0]
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid year: {}", &record[0]))?;
        years.push(year);

        for (column, field) in values.iter_mut().zip(record.iter().skip(1)) {
            let value = field
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid value for year {year}: {field}"))?;
            ensure!(value.is_finite(), "Non-finite value for year {year}");
            column.push(value);
        }
    }

    let mut table = Table::with_years(years);
    for (name, column) in headers.iter().skip(1).zip(values) {
        ensure!(!table.contains(name), "Duplicate column '{name}'");
        table.insert(name, Series::from(column));
    }

    Ok(table)
}

/// Read a table from a CSV file
pub fn read_table(file_path: &Path) -> Result<Table> {
    let file = fs::File::open(file_path).with_context(|| input_err_msg(file_path))?;
    read_table_from_reader(file).with_context(|| input_err_msg(file_path))
}

/// Read a table from a CSV file, returning an empty table if the file is absent
fn read_optional_table(file_path: &Path, axis: &YearAxis) -> Result<Table> {
    if !file_path.is_file() {
        debug!("{} not found; treating as empty", file_path.display());
        return Ok(Table::new(axis));
    }

    read_table(file_path)
}

/// Read all tables for one stream from its folder.
///
/// # Arguments
///
/// * `stream_dir` - Folder containing the stream's CSV files
/// * `axis` - The year axis, used for absent optional tables
pub fn read_stream_inputs(stream_dir: &Path, axis: &YearAxis) -> Result<StreamInputs> {
    let required = |name: &str| read_table(&stream_dir.join(format!("{name}.csv")));
    let optional = |name: &str| read_optional_table(&stream_dir.join(format!("{name}.csv")), axis);

    Ok(StreamInputs {
        production: required("production")?,
        price: required("price")?,
        capital: required("capital")?,
        ghg_intensity: required("ghg_intensity")?,
        ghg_emissions: required("ghg_emissions")?,
        consumption: optional("consumption")?,
        demand: optional("demand")?,
        ccs_demand: optional("ccs_demand")?,
        ccs_consumption: optional("ccs_consumption")?,
        resources_demand: optional("resources_demand")?,
        land_use: optional("land_use")?,
    })
}

/// Read the inputs of every configured stream and the sector-wide target production
fn read_mix_inputs(model_dir: &Path, parameters: &MixParameters) -> Result<MixInputs> {
    let axis = parameters.year_axis()?;
    let streams_dir = model_dir.join(STREAMS_DIR_NAME);

    let mut streams = IndexMap::new();
    for stream in &parameters.energy_list {
        let inputs = read_stream_inputs(&streams_dir.join(stream.as_str()), &axis)
            .with_context(|| format!("Failed to read inputs for stream {stream}"))?;
        streams.insert(stream.clone(), inputs);
    }

    Ok(MixInputs {
        streams,
        target_production: read_table(&model_dir.join(TARGET_PRODUCTION_FILE_NAME))?,
    })
}

/// Load the mix parameters and all inputs from the specified directory and validate them.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<(MixParameters, MixInputs)> {
    let model_dir = model_dir.as_ref();
    let parameters = MixParameters::from_path(model_dir)?;
    let inputs = read_mix_inputs(model_dir, &parameters)?;
    inputs.validate(&parameters.energy_list, &parameters.year_axis()?)?;

    Ok((parameters, inputs))
}

/// The IDs of streams with a folder in the model directory, sorted by name
pub fn list_stream_dirs(model_dir: &Path) -> Result<Vec<StreamID>> {
    let streams_dir = model_dir.join(STREAMS_DIR_NAME);
    let mut ids = Vec::new();
    for entry in fs::read_dir(&streams_dir).with_context(|| input_err_msg(&streams_dir))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ids.push(StreamID::from(entry.file_name().to_string_lossy().into_owned()));
        }
    }
    ids.sort();

    Ok(ids)
}
