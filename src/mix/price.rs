//! Stream prices, energy mix shares and the mean energy price.
use super::StreamRef;
use super::production::HEAT_LOSSES_COLUMN;
use crate::series::Series;
use crate::table::{TOTAL_COLUMN, Table};
use crate::year::YearAxis;
use anyhow::Result;

/// The column of the mean price table
pub const MEAN_PRICE_COLUMN: &str = "energy_price";

/// Collect the price of every stream, converted to mix units
pub fn stream_prices(axis: &YearAxis, streams: &[StreamRef], factor: f64) -> Result<Table> {
    let mut table = Table::new(axis);
    for (stream, inputs) in streams {
        // TODO: add the CO2 tax to stream prices
        let price = inputs.price.column(stream.as_str())?.scaled(factor);
        table.insert(stream.as_str(), price);
    }

    Ok(table)
}

/// Compute each stream's share, in percent, of net production excluding heat losses
pub fn energy_mix_shares(
    axis: &YearAxis,
    streams: &[StreamRef],
    net_production: &Table,
) -> Result<Table> {
    let useful = net_production.column(TOTAL_COLUMN)? - net_production.column(HEAT_LOSSES_COLUMN)?;

    let mut table = Table::new(axis);
    for (stream, _) in streams {
        let share = &(net_production.column(stream.as_str())? / &useful) * 100.0;
        table.insert(stream.as_str(), share);
    }

    Ok(table)
}

/// Compute the mean energy price, weighted by each stream's share of net production
pub fn mean_price(
    axis: &YearAxis,
    streams: &[StreamRef],
    energy_mix: &Table,
    prices: &Table,
) -> Result<Table> {
    let mut weighted = Vec::with_capacity(streams.len());
    for (stream, _) in streams {
        let share = energy_mix.column(stream.as_str())?;
        let price = prices.column(stream.as_str())?;
        weighted.push(share * price);
    }
    let mean = Series::sum_of(axis.zeros(), &weighted).scaled(0.01);

    Ok(Table::from_columns(axis, [(MEAN_PRICE_COLUMN, mean)]))
}
