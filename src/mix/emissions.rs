//! Greenhouse gas emissions and emission intensities of the energy streams.
use super::StreamRef;
use crate::ghg::GreenhouseGas;
use crate::table::Table;
use crate::year::YearAxis;
use anyhow::Result;
use indexmap::IndexMap;
use strum::IntoEnumIterator;

/// Collect the emission intensity of every stream, one table per gas
pub fn intensity_tables(
    axis: &YearAxis,
    streams: &[StreamRef],
    factor: f64,
) -> Result<IndexMap<GreenhouseGas, Table>> {
    let mut tables = IndexMap::new();
    for gas in GreenhouseGas::iter() {
        let mut table = Table::new(axis);
        for (stream, inputs) in streams {
            let intensity = inputs.ghg_intensity.column(gas.column_name())?;
            table.insert(stream.as_str(), intensity.scaled(factor));
        }
        tables.insert(gas, table);
    }

    Ok(tables)
}

/// Aggregate the emissions of every stream.
///
/// # Returns
///
/// A table of sector-wide emissions with one column per gas, and a table per gas breaking the
/// emissions down by stream.
pub fn emission_tables(
    axis: &YearAxis,
    streams: &[StreamRef],
    factor: f64,
) -> Result<(Table, IndexMap<GreenhouseGas, Table>)> {
    let mut totals = IndexMap::new();
    let mut by_stream = IndexMap::new();
    for gas in GreenhouseGas::iter() {
        let mut breakdown = Table::new(axis);
        for (stream, inputs) in streams {
            let emissions = inputs.ghg_emissions.column(gas.column_name())?.scaled(factor);
            *totals.entry(gas).or_insert_with(|| axis.zeros()) += &emissions;
            breakdown.insert(stream.as_str(), emissions);
        }
        by_stream.insert(gas, breakdown);
    }

    let total = Table::from_columns(
        axis,
        GreenhouseGas::iter().map(|gas| {
            let series = totals.swap_remove(&gas).unwrap_or_else(|| axis.zeros());
            (gas.column_name(), series)
        }),
    );

    Ok((total, by_stream))
}
