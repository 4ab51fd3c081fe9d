//! Integer vectors, the 2-D fraction view, and the mediant rule

use std::fmt;

use itertools::Itertools;
use num_integer::Integer;
use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Ordered tuple of `d` integers. For `d == 2` it reads as numerator/denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<i64>);

impl Vector {
    pub fn new(components: Vec<i64>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[i64] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Unit vector `e_axis` in `dimensions` dimensions.
    pub fn unit(axis: usize, dimensions: usize) -> DomainResult<Self> {
        if axis >= dimensions {
            return Err(DomainError::invalid_input(format!(
                "axis {} out of range for {} dimensions",
                axis, dimensions
            )));
        }
        let mut components = vec![0; dimensions];
        components[axis] = 1;
        Ok(Self(components))
    }
}

impl From<(i64, i64)> for Vector {
    fn from((numerator, denominator): (i64, i64)) -> Self {
        Self(vec![numerator, denominator])
    }
}

impl From<Vec<i64>> for Vector {
    fn from(components: Vec<i64>) -> Self {
        Self(components)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

/// Componentwise sum of two vectors of equal length.
///
/// Fails with `InvalidInput` on a length mismatch and with `Overflow` if a
/// component does not fit in `i64`.
#[instrument(level = "trace")]
pub fn mediant(left: &Vector, right: &Vector) -> DomainResult<Vector> {
    if left.dimensions() != right.dimensions() {
        return Err(DomainError::invalid_input(format!(
            "cannot take mediant of {} and {}: dimension mismatch",
            left, right
        )));
    }
    left.0
        .iter()
        .zip(&right.0)
        .map(|(a, b)| {
            a.checked_add(*b)
                .ok_or_else(|| DomainError::overflow(format!("mediant of {} and {}", left, right)))
        })
        .collect::<DomainResult<Vec<_>>>()
        .map(Vector)
}

/// The `d == 2` view of a [`Vector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `(n, 0)` is a valid tree node but has no numeric value.
    pub fn is_degenerate(&self) -> bool {
        self.denominator == 0
    }

    pub fn is_reduced(&self) -> bool {
        self.numerator.gcd(&self.denominator) == 1
    }

    /// Exact value. Degenerate fractions are flagged, never divided.
    pub fn ratio(&self) -> DomainResult<Ratio<i64>> {
        if self.is_degenerate() {
            return Err(self.degenerate());
        }
        Ok(Ratio::new(self.numerator, self.denominator))
    }

    /// Floating-point value for display; same flagging policy as [`Fraction::ratio`].
    pub fn to_f64(&self) -> DomainResult<f64> {
        if self.is_degenerate() {
            return Err(self.degenerate());
        }
        Ok(self.numerator as f64 / self.denominator as f64)
    }

    fn degenerate(&self) -> DomainError {
        DomainError::DegenerateFraction {
            numerator: self.numerator,
            denominator: self.denominator,
        }
    }
}

impl TryFrom<&Vector> for Fraction {
    type Error = DomainError;

    fn try_from(vector: &Vector) -> DomainResult<Self> {
        match vector.components() {
            [numerator, denominator] => Ok(Self::new(*numerator, *denominator)),
            other => Err(DomainError::invalid_input(format!(
                "fraction needs 2 components, got {}",
                other.len()
            ))),
        }
    }
}

impl From<Fraction> for Vector {
    fn from(fraction: Fraction) -> Self {
        Vector(vec![fraction.numerator, fraction.denominator])
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
