//! Fixtures for tests

use crate::ghg::GreenhouseGas;
use crate::mix::{EnergyMix, MixInputs, TARGET_PRODUCTION_COLUMN};
use crate::parameters::MixParameters;
use crate::series::Series;
use crate::stream::{CAPITAL_COLUMN, NON_USE_CAPITAL_COLUMN, StreamInputs};
use crate::table::Table;
use crate::units::{DeclaredUnits, UnitTable};
use crate::year::YearAxis;
use indexmap::IndexMap;
use rstest::fixture;
use strum::IntoEnumIterator;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn axis() -> YearAxis {
    YearAxis::new(2020, 2022).unwrap()
}

#[fixture]
pub fn parameters() -> MixParameters {
    MixParameters {
        year_start: 2020,
        year_end: 2022,
        energy_list: vec!["electricity".into(), "methane".into()],
        heat_losses_percentage: 0.0,
        coarse_streams: IndexMap::new(),
        units: DeclaredUnits::default(),
    }
}

/// Inputs for a stream with the given production and otherwise unremarkable data
pub fn stream_inputs<S: Into<Series>>(axis: &YearAxis, stream: &str, production: S) -> StreamInputs {
    let zeros_per_gas = || {
        Table::from_columns(
            axis,
            GreenhouseGas::iter().map(|gas| (gas.column_name(), axis.zeros())),
        )
    };

    StreamInputs {
        production: Table::from_columns(axis, [(stream, production.into())]),
        price: Table::from_columns(axis, [(stream, axis.constant(50.0))]),
        capital: Table::from_columns(
            axis,
            [
                (CAPITAL_COLUMN, axis.constant(1.0)),
                (NON_USE_CAPITAL_COLUMN, axis.zeros()),
            ],
        ),
        ghg_intensity: zeros_per_gas(),
        ghg_emissions: zeros_per_gas(),
        consumption: Table::new(axis),
        demand: Table::new(axis),
        ccs_demand: Table::new(axis),
        ccs_consumption: Table::new(axis),
        resources_demand: Table::new(axis),
        land_use: Table::new(axis),
    }
}

#[fixture]
pub fn mix_inputs(axis: YearAxis) -> MixInputs {
    MixInputs {
        streams: [
            (
                "electricity".into(),
                stream_inputs(&axis, "electricity", [10.0, 10.0, 10.0]),
            ),
            (
                "methane".into(),
                stream_inputs(&axis, "methane", [5.0, 5.0, 5.0]),
            ),
        ]
        .into_iter()
        .collect(),
        target_production: Table::from_columns(
            &axis,
            [(TARGET_PRODUCTION_COLUMN, axis.constant(20.0))],
        ),
    }
}

#[fixture]
pub fn energy_mix(parameters: MixParameters) -> EnergyMix {
    EnergyMix::new(&parameters, &UnitTable::default()).unwrap()
}
