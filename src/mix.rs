//! The energy mix aggregator.
//!
//! Combines the production, consumption, price, emission and capital data of every configured
//! energy stream into sector-wide tables. Aggregation is a single pass: each step only reads the
//! inputs and the results of earlier steps, and every run starts from scratch.
use crate::ghg::GreenhouseGas;
use crate::id::StreamID;
use crate::parameters::MixParameters;
use crate::stream::StreamInputs;
use crate::table::Table;
use crate::units::{ConversionFactors, UnitConverter};
use crate::year::YearAxis;
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::{debug, info};

pub mod capital;
pub mod emissions;
pub mod ledger;
pub mod price;
pub mod production;
pub mod ratio;

use production::CoarseStreams;

/// The column of the target production table holding the target
pub const TARGET_PRODUCTION_COLUMN: &str = "target_production";

/// A stream along with its inputs, in `energy_list` order
type StreamRef<'a> = (&'a StreamID, &'a StreamInputs);

/// All the data the aggregator consumes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MixInputs {
    /// The inputs of each stream
    pub streams: IndexMap<StreamID, StreamInputs>,
    /// Sector-wide target net production
    pub target_production: Table,
}

impl MixInputs {
    /// Get the inputs for the given stream
    fn stream(&self, stream: &StreamID) -> Result<&StreamInputs> {
        self.streams
            .get(stream)
            .with_context(|| format!("Missing inputs for stream {stream}"))
    }

    /// Check that every configured stream has valid inputs, as does the target production
    pub fn validate<'a, I>(&self, energy_list: I, axis: &YearAxis) -> Result<()>
    where
        I: IntoIterator<Item = &'a StreamID>,
    {
        for stream in energy_list {
            self.stream(stream)?.validate(stream, axis)?;
        }

        self.target_production
            .check_years(axis)
            .and_then(|()| self.target_production.column(TARGET_PRODUCTION_COLUMN))
            .context("Invalid target production table")?;
        ensure!(
            self.target_production
                .column(TARGET_PRODUCTION_COLUMN)?
                .iter()
                .all(|target| target >= 0.0),
            "Target production must not be negative"
        );

        Ok(())
    }
}

/// All the tables the aggregator produces
#[derive(Debug, Clone, PartialEq)]
pub struct MixOutputs {
    /// Raw production per stream, plus a total
    pub raw_production: Table,
    /// Net production per stream, plus heat losses and a total
    pub net_production: Table,
    /// Consumption of each stream within the energy sector, plus a total
    pub energy_consumption: Table,
    /// Demand per product
    pub energy_demand: Table,
    /// CCS demand per CCS product
    pub ccs_demand: Table,
    /// CCS consumption per CCS product
    pub ccs_consumption: Table,
    /// Resource demand per resource
    pub resources_demand: Table,
    /// Percentage of each product's demand which can be met by production
    pub availability_ratio: Table,
    /// Price per stream
    pub prices: Table,
    /// Production-weighted mean price
    pub mean_price: Table,
    /// Share of each stream in useful net production, in percent
    pub energy_mix: Table,
    /// Sector-wide emissions per gas
    pub ghg_emissions_total: Table,
    /// Emissions per stream, for each gas
    pub ghg_emissions_by_stream: IndexMap<GreenhouseGas, Table>,
    /// Emission intensity per stream, for each gas
    pub ghg_intensity: IndexMap<GreenhouseGas, Table>,
    /// Land use of every stream
    pub land_use: Table,
    /// Sector-wide capital and non-use capital
    pub capital: Table,
    /// Normalised residual of net production against the target
    pub target_production_constraint: Table,
}

impl MixOutputs {
    /// Iterate over every output table along with its name
    pub fn iter_tables(&self) -> impl Iterator<Item = (String, &Table)> {
        let fixed = [
            ("raw_production", &self.raw_production),
            ("net_production", &self.net_production),
            ("energy_consumption", &self.energy_consumption),
            ("energy_demand", &self.energy_demand),
            ("ccs_demand", &self.ccs_demand),
            ("ccs_consumption", &self.ccs_consumption),
            ("resources_demand", &self.resources_demand),
            ("availability_ratio", &self.availability_ratio),
            ("prices", &self.prices),
            ("mean_price", &self.mean_price),
            ("energy_mix", &self.energy_mix),
            ("ghg_emissions_total", &self.ghg_emissions_total),
            ("land_use", &self.land_use),
            ("capital", &self.capital),
            (
                "target_production_constraint",
                &self.target_production_constraint,
            ),
        ]
        .into_iter()
        .map(|(name, table)| (name.to_string(), table));

        let emissions = self
            .ghg_emissions_by_stream
            .iter()
            .map(|(gas, table)| (format!("ghg_emissions_{gas}"), table));
        let intensity = self
            .ghg_intensity
            .iter()
            .map(|(gas, table)| (format!("ghg_intensity_{gas}"), table));

        fixed.chain(emissions).chain(intensity)
    }
}

/// Aggregates the data of a fixed list of energy streams over a fixed year axis
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMix {
    axis: YearAxis,
    energy_list: IndexSet<StreamID>,
    heat_losses_percentage: f64,
    coarse_streams: CoarseStreams,
    factors: ConversionFactors,
}

impl EnergyMix {
    /// Configure a new aggregator.
    ///
    /// The year axis and stream list are fixed here for every subsequent run. Unit conversion
    /// factors are resolved once, using `converter`.
    pub fn new(parameters: &MixParameters, converter: &dyn UnitConverter) -> Result<Self> {
        parameters.validate()?;

        Ok(Self {
            axis: parameters.year_axis()?,
            energy_list: parameters.energy_list.iter().cloned().collect(),
            heat_losses_percentage: parameters.heat_losses_percentage,
            coarse_streams: CoarseStreams::new(parameters.coarse_streams.clone()),
            factors: ConversionFactors::resolve(&parameters.units, converter)?,
        })
    }

    /// The year axis
    pub fn axis(&self) -> &YearAxis {
        &self.axis
    }

    /// The configured streams, in order
    pub fn energy_list(&self) -> &IndexSet<StreamID> {
        &self.energy_list
    }

    /// The share of raw production lost in the raw-to-net conversion of a coarse stream.
    ///
    /// Zero for streams which are not coarse.
    pub fn coarse_production_loss(&self, stream: &str) -> f64 {
        self.coarse_streams.production_loss(stream)
    }

    /// Look up the inputs of every configured stream, in order
    fn resolve_streams<'a>(&'a self, inputs: &'a MixInputs) -> Result<Vec<StreamRef<'a>>> {
        self.energy_list
            .iter()
            .map(|stream| inputs.stream(stream).map(|s| (stream, s)))
            .try_collect()
    }

    /// Run the aggregation.
    ///
    /// # Returns
    ///
    /// Every aggregate table, or an error if the inputs are missing required data or are not
    /// aligned to the year axis.
    pub fn compute(&self, inputs: &MixInputs) -> Result<MixOutputs> {
        inputs.validate(&self.energy_list, &self.axis)?;
        let streams = self.resolve_streams(inputs)?;
        let axis = &self.axis;
        let factors = &self.factors;
        info!(
            "Aggregating {} streams over {}-{}",
            streams.len(),
            axis.start(),
            axis.end()
        );

        let raw_production = production::raw_production(axis, &streams, factors.production)?;
        let energy_consumption =
            ledger::energy_consumption(axis, &streams, factors.consumption);
        let net_production = production::net_production(
            &streams,
            &raw_production,
            &energy_consumption,
            &self.coarse_streams,
            self.heat_losses_percentage,
        )?;
        debug!("Computed raw and net production");

        let energy_demand = ledger::aggregate_ledger(
            axis,
            streams.iter().map(|(_, s)| &s.demand),
            factors.demand,
            &[],
        );
        let ccs_demand = ledger::aggregate_ledger(
            axis,
            streams.iter().map(|(_, s)| &s.ccs_demand),
            factors.ccs,
            &ledger::CCS_KEYS,
        );
        let ccs_consumption = ledger::aggregate_ledger(
            axis,
            streams.iter().map(|(_, s)| &s.ccs_consumption),
            factors.ccs,
            &ledger::CCS_KEYS,
        );
        let resources_demand = ledger::aggregate_ledger(
            axis,
            streams.iter().map(|(_, s)| &s.resources_demand),
            factors.resources,
            &[],
        );
        debug!(
            "Discovered demand keys: {}",
            energy_demand.column_names().join(", ")
        );

        let availability_ratio = ratio::availability_ratios(axis, &raw_production, &energy_demand);

        let prices = price::stream_prices(axis, &streams, factors.price)?;
        let energy_mix = price::energy_mix_shares(axis, &streams, &net_production)?;
        let mean_price = price::mean_price(axis, &streams, &energy_mix, &prices)?;

        let ghg_intensity = emissions::intensity_tables(axis, &streams, factors.ghg_intensity)?;
        let (ghg_emissions_total, ghg_emissions_by_stream) =
            emissions::emission_tables(axis, &streams, factors.ghg_emissions)?;

        let land_use = capital::land_use(axis, &streams, factors.land_use);
        let capital = capital::sector_capital(axis, &streams, factors.capital)?;
        let target_production_constraint =
            capital::target_production_constraint(axis, &net_production, &inputs.target_production)?;
        info!("Energy mix aggregation complete");

        Ok(MixOutputs {
            raw_production,
            net_production,
            energy_consumption,
            energy_demand,
            ccs_demand,
            ccs_consumption,
            resources_demand,
            availability_ratio,
            prices,
            mean_price,
            energy_mix,
            ghg_emissions_total,
            ghg_emissions_by_stream,
            ghg_intensity,
            land_use,
            capital,
            target_production_constraint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, energy_mix, mix_inputs, parameters, stream_inputs};
    use crate::series::Series;
    use crate::table::TOTAL_COLUMN;
    use crate::units::UnitTable;
    use float_cmp::approx_eq;
    use rstest::rstest;

    fn round2(series: &Series) -> Vec<f64> {
        series.iter().map(|x| (x * 100.0).round() / 100.0).collect()
    }

    #[rstest]
    fn test_compute_two_streams(energy_mix: EnergyMix, mix_inputs: MixInputs) {
        let outputs = energy_mix.compute(&mix_inputs).unwrap();

        assert_eq!(
            outputs.raw_production.column(TOTAL_COLUMN).unwrap(),
            &Series::from([15.0, 15.0, 15.0])
        );
        assert_eq!(
            outputs.net_production.column(TOTAL_COLUMN).unwrap(),
            &Series::from([15.0, 15.0, 15.0])
        );
        assert_eq!(
            round2(outputs.energy_mix.column("electricity").unwrap()),
            [66.67, 66.67, 66.67]
        );
        assert_eq!(
            round2(outputs.energy_mix.column("methane").unwrap()),
            [33.33, 33.33, 33.33]
        );
    }

    #[rstest]
    fn test_compute_raw_total_is_sum(energy_mix: EnergyMix, mix_inputs: MixInputs) {
        let outputs = energy_mix.compute(&mix_inputs).unwrap();
        let raw = &outputs.raw_production;
        let expected = raw.column("electricity").unwrap() + raw.column("methane").unwrap();
        assert_eq!(raw.column(TOTAL_COLUMN).unwrap(), &expected);
    }

    #[rstest]
    fn test_compute_mix_shares_sum_to_100(parameters: MixParameters, mut mix_inputs: MixInputs) {
        // Heat losses and internal consumption must not affect normalisation
        let parameters = MixParameters {
            heat_losses_percentage: 10.0,
            ..parameters
        };
        let axis = parameters.year_axis().unwrap();
        mix_inputs.streams["methane"]
            .consumption
            .insert("electricity", Series::from([1.0, 2.0, 3.0]));
        let energy_mix = EnergyMix::new(&parameters, &UnitTable::default()).unwrap();
        let outputs = energy_mix.compute(&mix_inputs).unwrap();

        for year in 0..axis.len() {
            let sum: f64 = outputs
                .energy_mix
                .iter()
                .map(|(_, series)| series[year])
                .sum();
            assert!(approx_eq!(f64, sum, 100.0, epsilon = 1e-9));
        }
    }

    #[rstest]
    fn test_compute_ccs_keys_always_present(energy_mix: EnergyMix, mix_inputs: MixInputs) {
        let outputs = energy_mix.compute(&mix_inputs).unwrap();
        for table in [&outputs.ccs_demand, &outputs.ccs_consumption] {
            for key in ledger::CCS_KEYS {
                assert_eq!(table.column(key).unwrap(), &energy_mix.axis().zeros());
            }
        }
    }

    #[rstest]
    fn test_compute_target_met(energy_mix: EnergyMix, mut mix_inputs: MixInputs) {
        let axis = energy_mix.axis().clone();
        mix_inputs.target_production =
            Table::from_columns(&axis, [(TARGET_PRODUCTION_COLUMN, axis.constant(15.0))]);
        let outputs = energy_mix.compute(&mix_inputs).unwrap();
        let constraint = outputs
            .target_production_constraint
            .column(capital::TARGET_CONSTRAINT_COLUMN)
            .unwrap();
        assert!(constraint.iter().all(|x| approx_eq!(f64, x, 0.0, epsilon = 1e-12)));
    }

    #[rstest]
    fn test_compute_is_idempotent(energy_mix: EnergyMix, mut mix_inputs: MixInputs) {
        mix_inputs.streams["electricity"]
            .demand
            .insert("methane", Series::from([2.0, 6.0, 8.0]));
        let first = energy_mix.compute(&mix_inputs).unwrap();
        let second = energy_mix.compute(&mix_inputs).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_compute_missing_stream(energy_mix: EnergyMix, mut mix_inputs: MixInputs) {
        mix_inputs.streams.shift_remove("methane");
        assert_error!(
            energy_mix.compute(&mix_inputs),
            "Missing inputs for stream methane"
        );
    }

    #[rstest]
    fn test_compute_missing_price(energy_mix: EnergyMix, mut mix_inputs: MixInputs) {
        let axis = energy_mix.axis().clone();
        mix_inputs.streams["methane"].price = Table::new(&axis);
        assert_error!(
            energy_mix.compute(&mix_inputs),
            "Invalid price table for stream methane"
        );
    }

    #[rstest]
    fn test_compute_missing_target(energy_mix: EnergyMix, mut mix_inputs: MixInputs) {
        let axis = energy_mix.axis().clone();
        mix_inputs.target_production = Table::new(&axis);
        assert_error!(
            energy_mix.compute(&mix_inputs),
            "Invalid target production table"
        );
    }

    #[rstest]
    fn test_compute_negative_target(energy_mix: EnergyMix, mut mix_inputs: MixInputs) {
        mix_inputs.target_production = Table::from_columns(
            energy_mix.axis(),
            [(
                TARGET_PRODUCTION_COLUMN,
                Series::from([10.0, -capital::TARGET_CONSTRAINT_EPSILON, 10.0]),
            )],
        );
        assert_error!(
            energy_mix.compute(&mix_inputs),
            "Target production must not be negative"
        );
    }

    #[rstest]
    fn test_coarse_stream_scenario(parameters: MixParameters) {
        let parameters = MixParameters {
            year_end: 2021,
            energy_list: vec!["fossil".into()],
            coarse_streams: [("fossil".into(), 0.9)].into_iter().collect(),
            ..parameters
        };
        let axis = parameters.year_axis().unwrap();
        let inputs = MixInputs {
            streams: [("fossil".into(), stream_inputs(&axis, "fossil", [100.0, 100.0]))]
                .into_iter()
                .collect(),
            target_production: Table::from_columns(
                &axis,
                [(TARGET_PRODUCTION_COLUMN, axis.constant(90.0))],
            ),
        };

        let energy_mix = EnergyMix::new(&parameters, &UnitTable::default()).unwrap();
        let outputs = energy_mix.compute(&inputs).unwrap();
        assert_eq!(
            outputs.net_production.column("fossil").unwrap(),
            &Series::from([90.0, 90.0])
        );
        assert!(approx_eq!(
            f64,
            energy_mix.coarse_production_loss("fossil"),
            0.1,
            epsilon = 1e-12
        ));
        assert_eq!(energy_mix.coarse_production_loss("electricity"), 0.0);
    }

    #[rstest]
    fn test_new_invalid_units(parameters: MixParameters) {
        let mut parameters = parameters;
        parameters.units.price.to = "TWh".into();
        assert_error!(
            EnergyMix::new(&parameters, &UnitTable::default()),
            "Invalid units for price"
        );
    }

    #[rstest]
    fn test_output_table_names(energy_mix: EnergyMix, mix_inputs: MixInputs) {
        let outputs = energy_mix.compute(&mix_inputs).unwrap();
        let names: Vec<_> = outputs.iter_tables().map(|(name, _)| name).collect();
        assert!(names.contains(&"ghg_emissions_CO2".to_string()));
        assert!(names.contains(&"ghg_intensity_N2O".to_string()));
        assert_eq!(names.len(), 15 + 2 * 3);
    }
}
