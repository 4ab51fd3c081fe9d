//! Simple continued fractions: the periodic surd expansion of `sqrt(n)`, the
//! closed-form expansion of `e`, and exact convergents.

use std::fmt;

use itertools::Itertools;
use num_bigint::BigInt;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Finite simple continued fraction `[a0; a1, ..., a_{k-1}]`.
///
/// `a0` may be any integer; every later term is positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContinuedFraction(Vec<i64>);

impl ContinuedFraction {
    pub fn new(terms: Vec<i64>) -> DomainResult<Self> {
        if terms.is_empty() {
            return Err(DomainError::invalid_input(
                "continued fraction needs at least one term",
            ));
        }
        if let Some((position, term)) = terms.iter().enumerate().skip(1).find(|(_, t)| **t <= 0) {
            return Err(DomainError::invalid_input(format!(
                "term {} at position {} must be positive",
                term, position
            )));
        }
        Ok(Self(terms))
    }

    pub fn terms(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn convergents(&self) -> DomainResult<Vec<Convergent>> {
        convergents(self)
    }
}

impl fmt::Display for ContinuedFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_first() {
            Some((head, [])) => write!(f, "[{}]", head),
            Some((head, tail)) => write!(f, "[{}; {}]", head, tail.iter().join(", ")),
            None => write!(f, "[]"),
        }
    }
}

/// Value of the prefix of length `index`, in lowest terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergent {
    pub index: usize,
    pub value: BigRational,
}

impl Convergent {
    pub fn numerator(&self) -> &BigInt {
        self.value.numer()
    }

    pub fn denominator(&self) -> &BigInt {
        self.value.denom()
    }

    /// Lossy, for display only.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }
}

/// One row of the presentation data contract for convergents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergentEntry {
    pub index: usize,
    pub numerator: String,
    pub denominator: String,
    pub value: f64,
}

impl From<&Convergent> for ConvergentEntry {
    fn from(c: &Convergent) -> Self {
        Self {
            index: c.index,
            numerator: c.numerator().to_string(),
            denominator: c.denominator().to_string(),
            value: c.to_f64(),
        }
    }
}

/// Continued fraction of `sqrt(n)`, at most `max_length` terms.
///
/// A perfect square yields the single term `[sqrt(n)]`. Otherwise the surd
/// state `(m, d, a)` advances as
/// `m' = d*a - m`, `d' = (n - m'^2) / d`, `a' = (a0 + m') / d'`,
/// where the division for `d'` must be exact.
#[instrument(level = "debug")]
pub fn sqrt_cf(n: i64, max_length: usize) -> DomainResult<ContinuedFraction> {
    if n <= 0 {
        return Err(DomainError::invalid_input(format!(
            "sqrt_cf needs a positive integer, got {}",
            n
        )));
    }
    if max_length == 0 {
        return Err(DomainError::invalid_input("max_length must be positive"));
    }

    let a0 = n.sqrt();
    if a0 * a0 == n {
        debug!(n, root = a0, "perfect square");
        return Ok(ContinuedFraction(vec![a0]));
    }

    let (n, a0_wide) = (i128::from(n), i128::from(a0));
    let (mut m, mut d, mut a) = (0i128, 1i128, a0_wide);
    let mut terms = Vec::with_capacity(max_length);
    terms.push(a0);
    while terms.len() < max_length {
        m = d * a - m;
        let numerator = n - m * m;
        if d == 0 || numerator % d != 0 {
            return Err(DomainError::invariant(format!(
                "({} - {}^2) is not divisible by {} while expanding sqrt({})",
                n, m, d, n
            )));
        }
        d = numerator / d;
        if d <= 0 {
            return Err(DomainError::invariant(format!(
                "surd denominator became {} while expanding sqrt({})",
                d, n
            )));
        }
        a = (a0_wide + m) / d;
        trace!(m = %m, d = %d, a = %a, "surd step");
        let term = i64::try_from(a).map_err(|_| DomainError::overflow("continued fraction term"))?;
        terms.push(term);
    }
    Ok(ContinuedFraction(terms))
}

/// `sqrt_cf` for every `n` in `from..=to`, in order.
#[instrument(level = "debug")]
pub fn sqrt_cf_range(
    from: i64,
    to: i64,
    max_length: usize,
) -> DomainResult<Vec<(i64, ContinuedFraction)>> {
    if from > to {
        return Err(DomainError::invalid_input(format!(
            "empty range {}..={}",
            from, to
        )));
    }
    (from..=to)
        .map(|n| sqrt_cf(n, max_length).map(|cf| (n, cf)))
        .collect()
}

/// Continued fraction of Euler's number, `[2; 1, 2, 1, 1, 4, 1, 1, 6, 1, ...]`,
/// truncated to exactly `limit` terms.
#[instrument(level = "debug")]
pub fn e_cf(limit: usize) -> DomainResult<ContinuedFraction> {
    if limit == 0 {
        return Err(DomainError::invalid_input("limit must be positive"));
    }
    let mut terms = Vec::with_capacity(limit + 2);
    terms.push(2);
    let mut k: i64 = 1;
    while terms.len() < limit {
        let even = k
            .checked_mul(2)
            .ok_or_else(|| DomainError::overflow("continued fraction term of e"))?;
        terms.extend([1, even, 1]);
        k += 1;
    }
    terms.truncate(limit);
    Ok(ContinuedFraction(terms))
}

/// Convergents for every prefix length `1..=len(cf)`.
///
/// Each prefix is folded tail to head, `value = a_j + 1 / value`, in exact
/// big-rational arithmetic.
#[instrument(level = "debug", skip(cf), fields(terms = cf.len()))]
pub fn convergents(cf: &ContinuedFraction) -> DomainResult<Vec<Convergent>> {
    let terms: Vec<BigRational> = cf
        .terms()
        .iter()
        .map(|&t| BigRational::from_integer(BigInt::from(t)))
        .collect();

    (1..=terms.len())
        .map(|index| {
            let prefix = &terms[..index];
            let (last, init) = prefix
                .split_last()
                .ok_or_else(|| DomainError::invariant("empty prefix"))?;
            let mut value = last.clone();
            for term in init.iter().rev() {
                if value.is_zero() {
                    return Err(DomainError::invariant(format!(
                        "zero tail while folding prefix of length {}",
                        index
                    )));
                }
                value = term + value.recip();
            }
            Ok(Convergent { index, value })
        })
        .collect()
}
