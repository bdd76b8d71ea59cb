//! The data supplied by each energy stream to the mix.
use crate::ghg::GreenhouseGas;
use crate::id::StreamID;
use crate::table::Table;
use crate::year::YearAxis;
use anyhow::{Context, Result};
use strum::IntoEnumIterator;

/// Column name for capital in a stream's capital table
pub const CAPITAL_COLUMN: &str = "capital";

/// Column name for non-use capital in a stream's capital table
pub const NON_USE_CAPITAL_COLUMN: &str = "non_use_capital";

/// All the tables a single energy stream supplies.
///
/// Optional tables may have no columns, in which case the stream contributes nothing to the
/// corresponding aggregate. The column names of the consumption, demand, CCS and resources tables
/// are product names and are not known in advance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamInputs {
    /// Raw production, with a column named after the stream (required)
    pub production: Table,
    /// Price, with a column named after the stream (required)
    pub price: Table,
    /// Capital and non-use capital (required)
    pub capital: Table,
    /// Emission intensity, one column per greenhouse gas (required)
    pub ghg_intensity: Table,
    /// Emissions, one column per greenhouse gas (required)
    pub ghg_emissions: Table,
    /// Consumption of other products by this stream's production
    pub consumption: Table,
    /// Demand for other products
    pub demand: Table,
    /// Demand for CCS products
    pub ccs_demand: Table,
    /// Consumption of CCS products
    pub ccs_consumption: Table,
    /// Demand for resources
    pub resources_demand: Table,
    /// Land use
    pub land_use: Table,
}

impl StreamInputs {
    /// Iterate over every table along with a name for it
    fn iter_tables(&self) -> impl Iterator<Item = (&'static str, &Table)> {
        [
            ("production", &self.production),
            ("price", &self.price),
            ("capital", &self.capital),
            ("ghg_intensity", &self.ghg_intensity),
            ("ghg_emissions", &self.ghg_emissions),
            ("consumption", &self.consumption),
            ("demand", &self.demand),
            ("ccs_demand", &self.ccs_demand),
            ("ccs_consumption", &self.ccs_consumption),
            ("resources_demand", &self.resources_demand),
            ("land_use", &self.land_use),
        ]
        .into_iter()
    }

    /// Check that all required columns are present and that all tables cover the year axis
    pub fn validate(&self, stream: &StreamID, axis: &YearAxis) -> Result<()> {
        for (name, table) in self.iter_tables() {
            if !table.is_empty() {
                table
                    .check_years(axis)
                    .with_context(|| format!("Invalid {name} table for stream {stream}"))?;
            }
        }

        let required = [
            ("production", &self.production, stream.as_str()),
            ("price", &self.price, stream.as_str()),
            ("capital", &self.capital, CAPITAL_COLUMN),
            ("capital", &self.capital, NON_USE_CAPITAL_COLUMN),
        ];
        for (name, table, column) in required {
            table
                .column(column)
                .with_context(|| format!("Invalid {name} table for stream {stream}"))?;
        }

        for gas in GreenhouseGas::iter() {
            for (name, table) in [
                ("ghg_intensity", &self.ghg_intensity),
                ("ghg_emissions", &self.ghg_emissions),
            ] {
                table
                    .column(gas.column_name())
                    .with_context(|| format!("Invalid {name} table for stream {stream}"))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, axis, stream_inputs};
    use crate::series::Series;
    use rstest::rstest;

    #[rstest]
    fn test_validate_ok(axis: YearAxis) {
        let inputs = stream_inputs(&axis, "electricity", [10.0, 10.0, 10.0]);
        assert!(inputs.validate(&"electricity".into(), &axis).is_ok());
    }

    #[rstest]
    fn test_validate_missing_production(axis: YearAxis) {
        let inputs = stream_inputs(&axis, "electricity", [10.0, 10.0, 10.0]);
        assert_error!(
            inputs.validate(&"methane".into(), &axis),
            "Invalid production table for stream methane"
        );
    }

    #[rstest]
    fn test_validate_missing_gas(axis: YearAxis) {
        let mut inputs = stream_inputs(&axis, "electricity", [10.0, 10.0, 10.0]);
        inputs.ghg_emissions = Table::from_columns(&axis, [("CO2", axis.zeros())]);
        assert_error!(
            inputs.validate(&"electricity".into(), &axis),
            "Invalid ghg_emissions table for stream electricity"
        );
    }

    #[rstest]
    fn test_validate_wrong_years(axis: YearAxis) {
        let mut inputs = stream_inputs(&axis, "electricity", [10.0, 10.0, 10.0]);
        let mut demand = Table::with_years(vec![2020, 2021]);
        demand.insert("methane", Series::zeros(2));
        inputs.demand = demand;
        assert_error!(
            inputs.validate(&"electricity".into(), &axis),
            "Invalid demand table for stream electricity"
        );
    }

    #[rstest]
    fn test_validate_optional_tables_empty(axis: YearAxis) {
        let mut inputs = stream_inputs(&axis, "electricity", [10.0, 10.0, 10.0]);
        inputs.consumption = Table::default();
        inputs.land_use = Table::default();
        assert!(inputs.validate(&"electricity".into(), &axis).is_ok());
    }
}
