//! Tables of named, year-indexed series.
use crate::series::Series;
use crate::year::YearAxis;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;

/// The name of the column holding the sum of the other columns
pub const TOTAL_COLUMN: &str = "Total";

/// A set of named series sharing the same years.
///
/// Columns keep the order in which they were inserted, so output is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    years: Vec<u32>,
    columns: IndexMap<String, Series>,
}

impl Table {
    /// Create a new table with no columns for the given axis
    pub fn new(axis: &YearAxis) -> Self {
        Self::with_years(axis.years())
    }

    /// Create a new table with no columns for the given years
    pub fn with_years(years: Vec<u32>) -> Self {
        Self {
            years,
            columns: IndexMap::new(),
        }
    }

    /// Create a table from an iterator of columns
    pub fn from_columns<I, S>(axis: &YearAxis, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut table = Self::new(axis);
        for (name, series) in columns {
            table.insert(name, series);
        }
        table
    }

    /// The years this table covers
    pub fn years(&self) -> &[u32] {
        &self.years
    }

    /// Whether the table has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Insert (or replace) a column.
    ///
    /// The series must be as long as the table's years.
    pub fn insert<S: Into<String>>(&mut self, name: S, series: Series) {
        assert_eq!(
            series.len(),
            self.years.len(),
            "Column length does not match the number of years"
        );
        self.columns.insert(name.into(), series);
    }

    /// Get a column, if present
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Get a required column
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.get(name)
            .with_context(|| format!("Missing column '{name}'"))
    }

    /// Whether a column with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate over column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate over columns in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.columns.iter().map(|(name, series)| (name.as_str(), series))
    }

    /// The number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Add a [`TOTAL_COLUMN`] holding the elementwise sum of all other columns
    pub fn insert_total(&mut self) {
        let total = Series::sum_of(
            Series::zeros(self.years.len()),
            self.columns
                .iter()
                .filter(|(name, _)| name.as_str() != TOTAL_COLUMN)
                .map(|(_, series)| series),
        );
        self.insert(TOTAL_COLUMN, total);
    }

    /// Check that the table covers exactly the years of `axis`
    pub fn check_years(&self, axis: &YearAxis) -> Result<()> {
        ensure!(
            self.years.iter().copied().eq(axis.iter()),
            "Years do not match the year axis {}-{}",
            axis.start(),
            axis.end()
        );

        Ok(())
    }
}
