//! Raw and net production of the energy streams.
use super::StreamRef;
use crate::id::StreamID;
use crate::table::{TOTAL_COLUMN, Table};
use crate::year::YearAxis;
use anyhow::Result;
use indexmap::IndexMap;
use log::warn;

/// The column of the net production table holding sector heat losses
pub const HEAT_LOSSES_COLUMN: &str = "heat_losses";

/// The smallest net production reported for a single stream
pub const NET_PRODUCTION_FLOOR: f64 = 1e-3;

/// Streams modelled with a single raw-to-net production factor instead of a consumption breakdown
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoarseStreams(IndexMap<StreamID, f64>);

impl CoarseStreams {
    /// Create from a map of stream to raw-to-net production factor
    pub fn new(factors: IndexMap<StreamID, f64>) -> Self {
        Self(factors)
    }

    /// The raw-to-net production factor of the stream, if it is coarse
    pub fn raw_to_net(&self, stream: &str) -> Option<f64> {
        self.0.get(stream).copied()
    }

    /// The share of raw production lost in the raw-to-net conversion (zero if not coarse)
    pub fn production_loss(&self, stream: &str) -> f64 {
        self.raw_to_net(stream).map_or(0.0, |factor| 1.0 - factor)
    }
}

/// Collect the raw production of every stream, converted to mix units, along with a total
pub fn raw_production(axis: &YearAxis, streams: &[StreamRef], factor: f64) -> Result<Table> {
    let mut table = Table::new(axis);
    for (stream, inputs) in streams {
        let production = inputs.production.column(stream.as_str())?;
        table.insert(stream.as_str(), production.scaled(factor));
    }
    table.insert_total();

    Ok(table)
}

/// Compute the net production of every stream, the sector heat losses and a total.
///
/// Net production is raw production less the stream's consumption within the energy sector, or
/// raw production scaled by the raw-to-net factor for coarse streams. Values are floored at
/// [`NET_PRODUCTION_FLOOR`]. Heat losses are a percentage of total raw production and are negative.
pub fn net_production(
    streams: &[StreamRef],
    raw_production: &Table,
    energy_consumption: &Table,
    coarse_streams: &CoarseStreams,
    heat_losses_percentage: f64,
) -> Result<Table> {
    let mut table = Table::with_years(raw_production.years().to_vec());
    for (stream, _) in streams {
        let raw = raw_production.column(stream.as_str())?;
        let net = match coarse_streams.raw_to_net(stream.as_str()) {
            Some(raw_to_net) => raw.scaled(raw_to_net),
            None => raw - energy_consumption.column(stream.as_str())?,
        };

        let (net, clamped) = net.floor_at(NET_PRODUCTION_FLOOR);
        if clamped > 0 {
            // Consumption within the sector exceeds production: report but carry on
            warn!(
                "Net production of {stream} is below {NET_PRODUCTION_FLOOR} in {clamped} year(s); \
                flooring"
            );
        }
        table.insert(stream.as_str(), net);
    }

    let heat_losses = raw_production
        .column(TOTAL_COLUMN)?
        .scaled(-heat_losses_percentage / 100.0);
    table.insert(HEAT_LOSSES_COLUMN, heat_losses);
    table.insert_total();

    Ok(table)
}
