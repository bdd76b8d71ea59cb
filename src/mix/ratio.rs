//! The share of each product's demand which production can satisfy.
use crate::table::{TOTAL_COLUMN, Table};
use crate::year::YearAxis;

/// Added to demand to avoid dividing by zero
pub const DEMAND_RATIO_EPSILON: f64 = 1e-6;

/// Compute the availability ratio, in percent, of every demanded product.
///
/// For products with a raw production column the ratio is production over demand, clipped to
/// `[0, 1]` and scaled to percent. Products nobody produces are assumed not to be limiting and get
/// 100 in every year. The total of raw production is not a product.
pub fn availability_ratios(axis: &YearAxis, raw_production: &Table, demand: &Table) -> Table {
    let mut table = Table::new(axis);
    for (product, product_demand) in demand.iter() {
        let production = (product != TOTAL_COLUMN)
            .then(|| raw_production.get(product))
            .flatten();
        let ratio = match production {
            Some(production) => production
                .zip_with(product_demand, |p, d| p / (d + DEMAND_RATIO_EPSILON))
                .clip(0.0, 1.0)
                .scaled(100.0),
            None => axis.constant(100.0),
        };
        table.insert(product, ratio);
    }

    table
}
