//! Per-level views over generated trees: first-seen deduplication and the
//! partition of fractions around 1.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::error::DomainResult;
use crate::domain::tree::TreeLevel;
use crate::domain::vector::{Fraction, Vector};

/// Keeps, per level, only the vectors not present in any earlier level.
///
/// Vectors compare by exact component values. The seen-set lives for this call
/// only.
#[instrument(level = "debug", skip(levels), fields(levels = levels.len()))]
pub fn unique_per_level(levels: &[TreeLevel]) -> Vec<TreeLevel> {
    let mut seen: HashSet<&Vector> = HashSet::new();
    let unique: Vec<TreeLevel> = levels
        .iter()
        .map(|level| {
            let fresh = level
                .iter()
                .filter(|vector| seen.insert(*vector))
                .cloned()
                .collect();
            TreeLevel::new(level.generation, fresh)
        })
        .collect();
    debug!(distinct = seen.len(), "deduplicated");
    unique
}

/// Fractions below 1 and above 1, level by level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitySplit {
    pub below: Vec<TreeLevel>,
    pub above: Vec<TreeLevel>,
}

/// Partitions each 2-D level into values `< 1` and `> 1`.
///
/// Comparison is exact and sign aware, so degenerate fractions are placed
/// without dividing: `n/0` is `+inf` for `n > 0` and `-inf` for `n < 0`.
/// `1/1` (and any fraction equal to it) and `0/0` land on neither side.
#[instrument(level = "debug", skip(levels), fields(levels = levels.len()))]
pub fn split_at_unity(levels: &[TreeLevel]) -> DomainResult<UnitySplit> {
    let mut below = Vec::with_capacity(levels.len());
    let mut above = Vec::with_capacity(levels.len());
    for level in levels {
        let mut low = Vec::new();
        let mut high = Vec::new();
        for (vector, fraction) in level.iter().zip(level.fractions()?) {
            match compare_to_one(&fraction) {
                Some(Ordering::Less) => low.push(vector.clone()),
                Some(Ordering::Greater) => high.push(vector.clone()),
                _ => {}
            }
        }
        below.push(TreeLevel::new(level.generation, low));
        above.push(TreeLevel::new(level.generation, high));
    }
    Ok(UnitySplit { below, above })
}

fn compare_to_one(fraction: &Fraction) -> Option<Ordering> {
    let (n, d) = (
        i128::from(fraction.numerator),
        i128::from(fraction.denominator),
    );
    if d == 0 {
        return match n.cmp(&0) {
            Ordering::Equal => None,
            other => Some(other),
        };
    }
    // n/d vs 1  <=>  (n - d) * d vs 0, since d^2 > 0
    Some(((n - d) * d).cmp(&0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::{generate_levels, stern_brocot_basis};
    use rstest::rstest;

    #[rstest]
    fn test_unique_per_level_classic() {
        let levels = generate_levels(&stern_brocot_basis(), 3, 2).unwrap();
        let unique = unique_per_level(&levels);
        let rendered: Vec<Vec<String>> = unique
            .iter()
            .map(|l| l.fractions().unwrap().iter().map(|f| f.to_string()).collect())
            .collect();
        assert_eq!(
            rendered,
            vec![
                vec!["0/1", "1/0"],
                vec!["1/1"],
                vec!["1/2", "2/1"],
                vec!["1/3", "2/3", "3/2", "3/1"],
            ]
        );
    }

    #[rstest]
    fn test_unique_per_level_keeps_generation_indices() {
        let levels = generate_levels(&stern_brocot_basis(), 2, 2).unwrap();
        let unique = unique_per_level(&levels);
        let generations: Vec<usize> = unique.iter().map(|l| l.generation).collect();
        assert_eq!(generations, vec![0, 1, 2]);
    }

    #[rstest]
    fn test_unique_per_level_drops_repeats_within_a_level() {
        let level = TreeLevel::new(
            0,
            vec![Vector::from((1, 2)), Vector::from((1, 2)), Vector::from((2, 4))],
        );
        let unique = unique_per_level(&[level]);
        // compared as given, no reduction
        assert_eq!(unique[0].vectors, vec![Vector::from((1, 2)), Vector::from((2, 4))]);
    }

    #[rstest]
    fn test_unique_per_level_empty_input() {
        assert!(unique_per_level(&[]).is_empty());
    }

    #[rstest]
    #[case(1, 2, Some(Ordering::Less))]
    #[case(3, 2, Some(Ordering::Greater))]
    #[case(2, 2, Some(Ordering::Equal))]
    #[case(1, 0, Some(Ordering::Greater))]
    #[case(-1, 0, Some(Ordering::Less))]
    #[case(0, 0, None)]
    #[case(-3, -2, Some(Ordering::Greater))]
    #[case(3, -2, Some(Ordering::Less))]
    fn test_compare_to_one(#[case] n: i64, #[case] d: i64, #[case] expected: Option<Ordering>) {
        assert_eq!(compare_to_one(&Fraction::new(n, d)), expected);
    }

    #[rstest]
    fn test_split_at_unity() {
        let levels = generate_levels(&stern_brocot_basis(), 2, 2).unwrap();
        let split = split_at_unity(&levels).unwrap();
        assert_eq!(split.below[2].vectors, vec![Vector::from((0, 1)), Vector::from((1, 2))]);
        assert_eq!(split.above[2].vectors, vec![Vector::from((2, 1)), Vector::from((1, 0))]);
        assert!(split.below[1].iter().all(|v| *v != Vector::from((1, 1))));
    }

    #[rstest]
    fn test_split_rejects_higher_dimensions() {
        let level = TreeLevel::new(0, vec![Vector::new(vec![1, 0, 0])]);
        assert!(split_at_unity(&[level]).is_err());
    }
}
