//! Aggregation of energy stream data into the sector-wide energy mix.
//!
//! Each energy stream reports its production, consumption, demand, prices, capital, land use and
//! greenhouse gas emissions. [`mix::EnergyMix`] combines these into sector totals, net
//! production, mix shares, a mean energy price and a target production constraint.
#![warn(missing_docs)]
pub mod cli;
pub mod ghg;
pub mod id;
pub mod input;
pub mod log;
pub mod mix;
pub mod output;
pub mod parameters;
pub mod series;
pub mod settings;
pub mod stream;
pub mod table;
pub mod units;
pub mod year;

#[cfg(test)]
mod fixture;
