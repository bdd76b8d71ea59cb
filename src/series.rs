//! Year-indexed series of values and the elementwise arithmetic on them.
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub};

/// A series of values, one per year of the axis.
///
/// All binary operations require both operands to be aligned to the same axis, which is checked
/// when inputs are validated. A length mismatch here is a programming error and panics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series(Vec<f64>);

impl Series {
    /// A series of `len` zeros
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// A series of `len` copies of `value`
    pub fn constant(len: usize, value: f64) -> Self {
        Self(vec![value; len])
    }

    /// The number of values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series holds no values
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying values
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Iterate over the values
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Apply `f` to every value
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        self.iter().map(f).collect()
    }

    /// Combine two aligned series value by value
    pub fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Series, f: F) -> Self {
        assert_eq!(self.len(), other.len(), "Series lengths differ");
        self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect()
    }

    /// Multiply every value by a scalar
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|x| x * factor)
    }

    /// Restrict every value to `[min, max]`
    pub fn clip(&self, min: f64, max: f64) -> Self {
        self.map(|x| x.clamp(min, max))
    }

    /// Raise every value below `min` to `min`.
    ///
    /// # Returns
    ///
    /// The floored series and the number of values which were raised.
    pub fn floor_at(&self, min: f64) -> (Self, usize) {
        let clamped = self.iter().filter(|x| *x < min).count();
        (self.map(|x| x.max(min)), clamped)
    }

    /// Elementwise sum of several series, starting from `zeros`.
    ///
    /// An empty iterator gives back `zeros`.
    pub fn sum_of<'a, I>(zeros: Series, iter: I) -> Self
    where
        I: IntoIterator<Item = &'a Series>,
    {
        iter.into_iter().fold(zeros, |mut acc, series| {
            acc += series;
            acc
        })
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for Series {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Series {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl AddAssign<&Series> for Series {
    fn add_assign(&mut self, rhs: &Series) {
        assert_eq!(self.len(), rhs.len(), "Series lengths differ");
        for (a, b) in self.0.iter_mut().zip(rhs.iter()) {
            *a += b;
        }
    }
}

macro_rules! impl_elementwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Series> for &Series {
            type Output = Series;

            fn $method(self, rhs: &Series) -> Series {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }
    };
}

impl_elementwise!(Add, add, +);
impl_elementwise!(Sub, sub, -);
impl_elementwise!(Mul, mul, *);
impl_elementwise!(Div, div, /);

impl Mul<f64> for &Series {
    type Output = Series;

    fn mul(self, rhs: f64) -> Series {
        self.scaled(rhs)
    }
}

impl Add<f64> for &Series {
    type Output = Series;

    fn add(self, rhs: f64) -> Series {
        self.map(|x| x + rhs)
    }
}

impl Neg for &Series {
    type Output = Series;

    fn neg(self) -> Series {
        self.map(|x| -x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_arithmetic() {
        let a = Series::from([1.0, 2.0, 3.0]);
        let b = Series::from([4.0, 5.0, 6.0]);
        assert_eq!(&a + &b, Series::from([5.0, 7.0, 9.0]));
        assert_eq!(&b - &a, Series::from([3.0, 3.0, 3.0]));
        assert_eq!(&a * &b, Series::from([4.0, 10.0, 18.0]));
        assert_eq!(&b / &a, Series::from([4.0, 2.5, 2.0]));
        assert_eq!(&a * 2.0, Series::from([2.0, 4.0, 6.0]));
        assert_eq!(&a + 1.0, Series::from([2.0, 3.0, 4.0]));
        assert_eq!(-&a, Series::from([-1.0, -2.0, -3.0]));
    }

    #[test]
    #[should_panic(expected = "Series lengths differ")]
    fn test_series_length_mismatch() {
        let _ = &Series::zeros(2) + &Series::zeros(3);
    }

    #[test]
    fn test_series_clip_and_floor() {
        let s = Series::from([-1.0, 0.5, 2.0]);
        assert_eq!(s.clip(0.0, 1.0), Series::from([0.0, 0.5, 1.0]));

        let (floored, clamped) = s.floor_at(1e-3);
        assert_eq!(floored, Series::from([1e-3, 0.5, 2.0]));
        assert_eq!(clamped, 1);
    }

    #[test]
    fn test_series_sum_of() {
        let a = Series::from([1.0, 2.0]);
        let b = Series::from([3.0, 4.0]);
        assert_eq!(
            Series::sum_of(Series::zeros(2), [&a, &b]),
            Series::from([4.0, 6.0])
        );
        assert_eq!(Series::sum_of(Series::zeros(2), []), Series::zeros(2));
    }
}
