//! The greenhouse gases tracked by the energy mix.
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A greenhouse gas.
///
/// The string form is used as the column name in per-stream emission and intensity tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum GreenhouseGas {
    /// Carbon dioxide
    CO2,
    /// Methane
    CH4,
    /// Nitrous oxide
    N2O,
}

impl GreenhouseGas {
    /// The column name for this gas
    pub fn column_name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_gas_names() {
        let names: Vec<_> = GreenhouseGas::iter().map(GreenhouseGas::column_name).collect();
        assert_eq!(names, ["CO2", "CH4", "N2O"]);
        assert_eq!(GreenhouseGas::from_str("CH4").unwrap(), GreenhouseGas::CH4);
        assert!(GreenhouseGas::from_str("SF6").is_err());
    }
}
