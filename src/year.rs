//! Code for working with the year axis shared by every series.
use crate::series::Series;
use anyhow::{Result, ensure};
use std::ops::RangeInclusive;

/// The consecutive, inclusive range of years over which every series is defined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearAxis {
    range: RangeInclusive<u32>,
}

impl YearAxis {
    /// Create a new year axis covering `year_start..=year_end`.
    ///
    /// # Returns
    ///
    /// The axis, or an error if `year_start` is after `year_end`.
    pub fn new(year_start: u32, year_end: u32) -> Result<Self> {
        ensure!(
            year_start <= year_end,
            "`year_start` ({year_start}) must not be greater than `year_end` ({year_end})"
        );

        Ok(Self {
            range: year_start..=year_end,
        })
    }

    /// The first year
    pub fn start(&self) -> u32 {
        *self.range.start()
    }

    /// The last year
    pub fn end(&self) -> u32 {
        *self.range.end()
    }

    /// Iterate over the years in order
    pub fn iter(&self) -> impl Iterator<Item = u32> + Clone + use<> {
        self.range.clone()
    }

    /// The years as a vector
    pub fn years(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// The number of years
    pub fn len(&self) -> usize {
        (self.end() - self.start()) as usize + 1
    }

    /// An axis always holds at least one year
    pub fn is_empty(&self) -> bool {
        false
    }

    /// A zero-filled series aligned to this axis, used as the identity for sums
    pub fn zeros(&self) -> Series {
        Series::zeros(self.len())
    }

    /// A constant series aligned to this axis
    pub fn constant(&self, value: f64) -> Series {
        Series::constant(self.len(), value)
    }
}
