//! Land use, sector capital and the target production constraint.
use super::StreamRef;
use super::TARGET_PRODUCTION_COLUMN;
use crate::series::Series;
use crate::stream::{CAPITAL_COLUMN, NON_USE_CAPITAL_COLUMN};
use crate::table::{TOTAL_COLUMN, Table};
use crate::year::YearAxis;
use anyhow::Result;

/// The column of the target production constraint table
pub const TARGET_CONSTRAINT_COLUMN: &str = "target_production_constraint";

/// Added to the target to avoid dividing by zero
pub const TARGET_CONSTRAINT_EPSILON: f64 = 1e-3;

/// Collect the land use columns of every stream into one table.
///
/// Columns are named `"<stream> (<column>)"`; nothing is summed.
pub fn land_use(axis: &YearAxis, streams: &[StreamRef], factor: f64) -> Table {
    let mut table = Table::new(axis);
    for (stream, inputs) in streams {
        for (column, series) in inputs.land_use.iter() {
            table.insert(format!("{stream} ({column})"), series.scaled(factor));
        }
    }

    table
}

/// Sum the capital and non-use capital of every stream
pub fn sector_capital(axis: &YearAxis, streams: &[StreamRef], factor: f64) -> Result<Table> {
    let mut table = Table::new(axis);
    for column in [CAPITAL_COLUMN, NON_USE_CAPITAL_COLUMN] {
        let mut sum = axis.zeros();
        for (_, inputs) in streams {
            sum += inputs.capital.column(column)?;
        }
        table.insert(column, sum.scaled(factor));
    }

    Ok(table)
}

/// Compute the normalised residual of total net production against the target.
///
/// Negative when the target is not exceeded, as expected of an inequality constraint.
pub fn target_production_constraint(
    axis: &YearAxis,
    net_production: &Table,
    target_production: &Table,
) -> Result<Table> {
    let actual = net_production.column(TOTAL_COLUMN)?;
    let target = target_production.column(TARGET_PRODUCTION_COLUMN)?;
    let constraint: Series = &(actual - target) / &(target + TARGET_CONSTRAINT_EPSILON);

    Ok(Table::from_columns(
        axis,
        [(TARGET_CONSTRAINT_COLUMN, constraint)],
    ))
}
