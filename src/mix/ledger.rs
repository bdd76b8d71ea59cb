//! Ledgers of consumption and demand keyed by product.
//!
//! Streams declare what they consume or demand with one column per product. The set of products is
//! not known in advance: it is discovered from the columns the streams supply.
use super::StreamRef;
use crate::table::Table;
use crate::year::YearAxis;
use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;

/// The CCS product for captured carbon
pub const CARBON_CAPTURED: &str = "carbon_captured";

/// The CCS product for stored carbon
pub const CARBON_STORAGE: &str = "carbon_storage";

/// Keys always present in the CCS ledgers
pub const CCS_KEYS: [&str; 2] = [CARBON_CAPTURED, CARBON_STORAGE];

/// Sum tables column by column, discovering the columns as we go.
///
/// The first pass collects every column name, starting with `required_keys`, in order of first
/// appearance. The second pass adds each table's columns, converted with `factor`, to a zero-filled
/// accumulator per key. Required keys no table supplies are left as zeros.
pub fn aggregate_ledger<'a, I>(
    axis: &YearAxis,
    tables: I,
    factor: f64,
    required_keys: &[&str],
) -> Table
where
    I: IntoIterator<Item = &'a Table> + Clone,
{
    let mut keys: IndexSet<&str> = required_keys.iter().copied().collect();
    for table in tables.clone() {
        keys.extend(table.column_names());
    }

    let mut accumulators = vec![axis.zeros(); keys.len()];
    for table in tables {
        for (name, series) in table.iter() {
            let idx = keys.get_index_of(name).expect("Key collected in first pass");
            accumulators[idx] += &series.scaled(factor);
        }
    }

    Table::from_columns(axis, keys.into_iter().zip(accumulators))
}

/// Sum the consumption of each configured stream by the production of all streams.
///
/// Consumed products which are not configured streams do not belong to the energy sector and are
/// left out. A stream nobody consumes gets a zero column.
pub fn energy_consumption(axis: &YearAxis, streams: &[StreamRef], factor: f64) -> Table {
    let ledger = aggregate_ledger(axis, streams.iter().map(|(_, s)| &s.consumption), factor, &[]);
    let outside = ledger
        .column_names()
        .filter(|name| !streams.iter().any(|(stream, _)| stream.as_str() == *name))
        .collect_vec();
    if !outside.is_empty() {
        debug!(
            "Consumed products outside the energy sector: {}",
            outside.join(", ")
        );
    }

    let mut table = Table::new(axis);
    for (stream, _) in streams {
        let consumption = ledger
            .get(stream.as_str())
            .cloned()
            .unwrap_or_else(|| axis.zeros());
        table.insert(stream.as_str(), consumption);
    }
    table.insert_total();

    table
}
