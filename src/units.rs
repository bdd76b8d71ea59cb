//! Unit conversion between stream-level and mix-level representations.
//!
//! Every input category is declared with the unit it is supplied in and the unit the mix reports
//! it in. The multiplicative factor between the two is resolved once, through a [`UnitConverter`],
//! when the aggregator is constructed.
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::HashMap;

/// The physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Dimension {
    /// Energy (base unit: kWh)
    Energy,
    /// Mass (base unit: kg)
    Mass,
    /// Money (base unit: $)
    Money,
    /// Area (base unit: ha)
    Area,
    /// Price of energy (base unit: $/kWh)
    MoneyPerEnergy,
    /// Emission intensity (base unit: kg/kWh)
    MassPerEnergy,
}

/// Resolves the multiplicative factor converting values in one unit into another
pub trait UnitConverter {
    /// Get the factor `f` such that `value_in_to = f * value_in_from`
    fn factor(&self, from: &str, to: &str) -> Result<f64>;
}

/// A lookup table of units, each with a dimension and a scale relative to the dimension's base unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable(HashMap<String, (Dimension, f64)>);

impl UnitTable {
    /// Create an empty table
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Add a unit to the table, replacing any existing unit with the same name
    pub fn with_unit(mut self, name: &str, dimension: Dimension, scale: f64) -> Self {
        self.0.insert(name.to_string(), (dimension, scale));
        self
    }

    fn lookup(&self, unit: &str) -> Result<(Dimension, f64)> {
        self.0
            .get(unit)
            .copied()
            .with_context(|| format!("Unknown unit: {unit}"))
    }
}

impl Default for UnitTable {
    /// The units used by energy stream models
    fn default() -> Self {
        use Dimension::{Area, Energy, Mass, MassPerEnergy, Money, MoneyPerEnergy};

        [
            ("Wh", Energy, 1e-3),
            ("kWh", Energy, 1.0),
            ("MWh", Energy, 1e3),
            ("GWh", Energy, 1e6),
            ("TWh", Energy, 1e9),
            ("PWh", Energy, 1e12),
            ("kg", Mass, 1.0),
            ("t", Mass, 1e3),
            ("kt", Mass, 1e6),
            ("Mt", Mass, 1e9),
            ("Gt", Mass, 1e12),
            ("$", Money, 1.0),
            ("k$", Money, 1e3),
            ("M$", Money, 1e6),
            ("G$", Money, 1e9),
            ("T$", Money, 1e12),
            ("ha", Area, 1.0),
            ("Mha", Area, 1e6),
            ("Gha", Area, 1e9),
            ("$/kWh", MoneyPerEnergy, 1.0),
            ("$/MWh", MoneyPerEnergy, 1e-3),
            ("kg/kWh", MassPerEnergy, 1.0),
            ("kg/MWh", MassPerEnergy, 1e-3),
            ("Mt/TWh", MassPerEnergy, 1.0),
            ("Gt/PWh", MassPerEnergy, 1.0),
        ]
        .into_iter()
        .fold(Self::empty(), |table, (name, dimension, scale)| {
            table.with_unit(name, dimension, scale)
        })
    }
}

impl UnitConverter for UnitTable {
    fn factor(&self, from: &str, to: &str) -> Result<f64> {
        let (from_dim, from_scale) = self.lookup(from)?;
        let (to_dim, to_scale) = self.lookup(to)?;
        ensure!(
            from_dim == to_dim,
            "Cannot convert {from} ({from_dim}) to {to} ({to_dim})"
        );

        Ok(from_scale / to_scale)
    }
}

/// The declared input and output units of one category of data
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitPair {
    /// The unit the per-stream data is supplied in
    pub from: String,
    /// The unit the mix reports the data in
    pub to: String,
}

impl UnitPair {
    /// A pair whose input and output units are the same
    pub fn identity(unit: &str) -> Self {
        Self {
            from: unit.to_string(),
            to: unit.to_string(),
        }
    }

    fn resolve(&self, converter: &dyn UnitConverter) -> Result<f64> {
        converter.factor(&self.from, &self.to)
    }
}

macro_rules! define_unit_default {
    ($name:ident, $unit:expr) => {
        fn $name() -> UnitPair {
            UnitPair::identity($unit)
        }
    };
}

define_unit_default!(default_energy_units, "TWh");
define_unit_default!(default_mass_units, "Mt");
define_unit_default!(default_price_units, "$/MWh");
define_unit_default!(default_land_use_units, "Gha");
define_unit_default!(default_capital_units, "G$");
define_unit_default!(default_intensity_units, "kg/kWh");

/// The declared units of every category of input data
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeclaredUnits {
    /// Raw production of each stream
    #[serde(default = "default_energy_units")]
    pub production: UnitPair,
    /// Energy consumed within the energy sector
    #[serde(default = "default_energy_units")]
    pub consumption: UnitPair,
    /// Demand for energy products
    #[serde(default = "default_energy_units")]
    pub demand: UnitPair,
    /// CCS demand and consumption
    #[serde(default = "default_mass_units")]
    pub ccs: UnitPair,
    /// Demand for resources
    #[serde(default = "default_mass_units")]
    pub resources: UnitPair,
    /// Stream prices
    #[serde(default = "default_price_units")]
    pub price: UnitPair,
    /// Land use
    #[serde(default = "default_land_use_units")]
    pub land_use: UnitPair,
    /// Capital and non-use capital
    #[serde(default = "default_capital_units")]
    pub capital: UnitPair,
    /// Greenhouse gas emissions
    #[serde(default = "default_mass_units")]
    pub ghg_emissions: UnitPair,
    /// Greenhouse gas intensity
    #[serde(default = "default_intensity_units")]
    pub ghg_intensity: UnitPair,
}

impl Default for DeclaredUnits {
    fn default() -> Self {
        Self {
            production: default_energy_units(),
            consumption: default_energy_units(),
            demand: default_energy_units(),
            ccs: default_mass_units(),
            resources: default_mass_units(),
            price: default_price_units(),
            land_use: default_land_use_units(),
            capital: default_capital_units(),
            ghg_emissions: default_mass_units(),
            ghg_intensity: default_intensity_units(),
        }
    }
}

/// Conversion factors for every category of input data, resolved once per aggregator
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionFactors {
    pub production: f64,
    pub consumption: f64,
    pub demand: f64,
    pub ccs: f64,
    pub resources: f64,
    pub price: f64,
    pub land_use: f64,
    pub capital: f64,
    pub ghg_emissions: f64,
    pub ghg_intensity: f64,
}

impl ConversionFactors {
    /// Resolve the factors for the declared units
    pub fn resolve(units: &DeclaredUnits, converter: &dyn UnitConverter) -> Result<Self> {
        let resolve = |pair: &UnitPair, category: &str| {
            pair.resolve(converter)
                .with_context(|| format!("Invalid units for {category}"))
        };

        Ok(Self {
            production: resolve(&units.production, "production")?,
            consumption: resolve(&units.consumption, "consumption")?,
            demand: resolve(&units.demand, "demand")?,
            ccs: resolve(&units.ccs, "ccs")?,
            resources: resolve(&units.resources, "resources")?,
            price: resolve(&units.price, "price")?,
            land_use: resolve(&units.land_use, "land_use")?,
            capital: resolve(&units.capital, "capital")?,
            ghg_emissions: resolve(&units.ghg_emissions, "ghg_emissions")?,
            ghg_intensity: resolve(&units.ghg_intensity, "ghg_intensity")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use float_cmp::assert_approx_eq;
    use map_macro::hash_map;
    use rstest::rstest;

    /// A converter that only knows a fixed set of factors
    struct FixedFactors(HashMap<(&'static str, &'static str), f64>);

    impl UnitConverter for FixedFactors {
        fn factor(&self, from: &str, to: &str) -> Result<f64> {
            if from == to {
                return Ok(1.0);
            }

            self.0
                .iter()
                .find(|((f, t), _)| *f == from && *t == to)
                .map(|(_, factor)| *factor)
                .with_context(|| format!("No factor from {from} to {to}"))
        }
    }

    #[rstest]
    #[case("TWh", "TWh", 1.0)]
    #[case("PWh", "TWh", 1e3)]
    #[case("TWh", "PWh", 1e-3)]
    #[case("Gt", "Mt", 1e3)]
    #[case("$/kWh", "$/MWh", 1e3)]
    #[case("T$", "G$", 1e3)]
    fn test_unit_table_factor(#[case] from: &str, #[case] to: &str, #[case] expected: f64) {
        assert_approx_eq!(
            f64,
            UnitTable::default().factor(from, to).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_unit_table_errors() {
        let table = UnitTable::default();
        assert_error!(table.factor("furlong", "TWh"), "Unknown unit: furlong");
        assert_error!(
            table.factor("TWh", "Mt"),
            "Cannot convert TWh (Energy) to Mt (Mass)"
        );
    }

    #[test]
    fn test_conversion_factors_resolve() {
        let units = DeclaredUnits {
            production: UnitPair {
                from: "PWh".into(),
                to: "TWh".into(),
            },
            ..DeclaredUnits::default()
        };
        let factors = ConversionFactors::resolve(&units, &UnitTable::default()).unwrap();
        assert_approx_eq!(f64, factors.production, 1e3, epsilon = 1e-12);
        assert_approx_eq!(f64, factors.capital, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_conversion_factors_synthetic_units() {
        let table = UnitTable::empty()
            .with_unit("a", Dimension::Energy, 2.0)
            .with_unit("b", Dimension::Energy, 1.0);
        let units = DeclaredUnits {
            production: UnitPair {
                from: "a".into(),
                to: "b".into(),
            },
            ..DeclaredUnits::default()
        };

        // Only the units known to the converter can be resolved
        assert_error!(
            ConversionFactors::resolve(&units, &table),
            "Invalid units for consumption"
        );
    }

    #[test]
    fn test_conversion_factors_injected_converter() {
        let converter = FixedFactors(hash_map! {
            ("PWh", "TWh") => 1e3,
            ("Gt", "Mt") => 1e3,
        });
        let units = DeclaredUnits {
            production: UnitPair {
                from: "PWh".into(),
                to: "TWh".into(),
            },
            ghg_emissions: UnitPair {
                from: "Gt".into(),
                to: "Mt".into(),
            },
            ..DeclaredUnits::default()
        };

        let factors = ConversionFactors::resolve(&units, &converter).unwrap();
        assert_approx_eq!(f64, factors.production, 1e3);
        assert_approx_eq!(f64, factors.ghg_emissions, 1e3);
        assert_approx_eq!(f64, factors.price, 1.0);
    }
}
