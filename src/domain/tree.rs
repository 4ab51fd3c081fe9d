//! Mediant tree generation
//!
//! One generation step walks the current sequence and inserts the mediant of
//! every adjacent pair between them. Endpoints never move, so after `g` steps a
//! basis of length `L` has grown to `(L - 1) * 2^g + 1` elements.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::domain::arena::MediantArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::vector::{mediant, Fraction, Vector};

/// The ordered vectors present after exactly `generation` steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeLevel {
    pub generation: usize,
    pub vectors: Vec<Vector>,
}

impl TreeLevel {
    pub fn new(generation: usize, vectors: Vec<Vector>) -> Self {
        Self {
            generation,
            vectors,
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.vectors.iter()
    }

    /// Reads every vector as a fraction; fails unless the level is 2-D.
    pub fn fractions(&self) -> DomainResult<Vec<Fraction>> {
        self.vectors.iter().map(Fraction::try_from).collect()
    }
}

/// One `(level, vector)` pair of the presentation data contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelEntry {
    pub level: usize,
    pub vector: Vector,
}

/// Flattens levels into `(level, vector)` pairs, preserving order.
pub fn level_entries(levels: &[TreeLevel]) -> Vec<LevelEntry> {
    levels
        .iter()
        .flat_map(|level| {
            level.iter().map(move |vector| LevelEntry {
                level: level.generation,
                vector: vector.clone(),
            })
        })
        .collect()
}

/// Length after `generations` steps: `(basis_len - 1) * 2^generations + 1`.
///
/// `None` when the result does not fit in `usize`, which callers can treat as
/// "certainly over budget".
pub fn level_len(basis_len: usize, generations: usize) -> Option<usize> {
    let gaps = basis_len.checked_sub(1)?;
    let factor = u32::try_from(generations)
        .ok()
        .and_then(|g| 1usize.checked_shl(g))?;
    gaps.checked_mul(factor)?.checked_add(1)
}

/// The classic Stern-Brocot basis `[(0, 1), (1, 0)]`.
pub fn stern_brocot_basis() -> Vec<Vector> {
    vec![Vector::from((0, 1)), Vector::from((1, 0))]
}

/// Unit vectors `e_0 .. e_{d-1}`, the simplex analog of the classic basis.
pub fn simplex_basis(dimensions: usize) -> DomainResult<Vec<Vector>> {
    if dimensions < 2 {
        return Err(DomainError::invalid_input(format!(
            "dimensions must be at least 2, got {}",
            dimensions
        )));
    }
    (0..dimensions)
        .map(|axis| Vector::unit(axis, dimensions))
        .collect()
}

pub(crate) fn validate_basis(basis: &[Vector], dimensions: usize) -> DomainResult<()> {
    if dimensions < 2 {
        return Err(DomainError::invalid_input(format!(
            "dimensions must be at least 2, got {}",
            dimensions
        )));
    }
    if basis.len() < 2 {
        return Err(DomainError::invalid_input(format!(
            "basis needs at least 2 elements, got {}",
            basis.len()
        )));
    }
    if let Some((position, bad)) = basis
        .iter()
        .enumerate()
        .find(|(_, v)| v.dimensions() != dimensions)
    {
        return Err(DomainError::invalid_input(format!(
            "basis element {} at position {} has {} components, expected {}",
            bad,
            position,
            bad.dimensions(),
            dimensions
        )));
    }
    Ok(())
}

/// Generates mediant trees over a fixed dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeGenerator {
    dimensions: usize,
    parallel_threshold: Option<usize>,
}

impl TreeGenerator {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            parallel_threshold: None,
        }
    }

    /// Compute mediants with rayon once a level has at least `threshold`
    /// elements. Output order is unaffected.
    pub fn with_parallel_threshold(mut self, threshold: Option<usize>) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Iterative form: repeats the insertion step `generations` times.
    #[instrument(level = "debug", skip(self, basis), fields(basis_len = basis.len()))]
    pub fn generate(&self, basis: &[Vector], generations: usize) -> DomainResult<Vec<Vector>> {
        validate_basis(basis, self.dimensions)?;
        let mut current = basis.to_vec();
        for generation in 1..=generations {
            current = self.step(&current)?;
            trace!(generation, len = current.len(), "generation complete");
        }
        debug!(len = current.len(), "generated");
        Ok(current)
    }

    /// Self-referential form, `generate(g) = step(generate(g - 1))`, evaluated
    /// on a [`MediantArena`] instead of the call stack.
    #[instrument(level = "debug", skip(self, basis), fields(basis_len = basis.len()))]
    pub fn generate_recursive(
        &self,
        basis: &[Vector],
        generations: usize,
    ) -> DomainResult<Vec<Vector>> {
        let arena = MediantArena::grow(basis, generations, self.dimensions)?;
        Ok(arena.last_level())
    }

    /// Every level from `0` through `generations`, in order.
    #[instrument(level = "debug", skip(self, basis), fields(basis_len = basis.len()))]
    pub fn levels(&self, basis: &[Vector], generations: usize) -> DomainResult<Vec<TreeLevel>> {
        validate_basis(basis, self.dimensions)?;
        let mut levels = Vec::with_capacity(generations + 1);
        levels.push(TreeLevel::new(0, basis.to_vec()));
        for generation in 1..=generations {
            let next = self.step(&levels[generation - 1].vectors)?;
            levels.push(TreeLevel::new(generation, next));
        }
        Ok(levels)
    }

    fn step(&self, current: &[Vector]) -> DomainResult<Vec<Vector>> {
        let mediants: Vec<Vector> = match self.parallel_threshold {
            Some(threshold) if current.len() >= threshold => current
                .par_windows(2)
                .map(|pair| mediant(&pair[0], &pair[1]))
                .collect::<DomainResult<_>>()?,
            _ => current
                .windows(2)
                .map(|pair| mediant(&pair[0], &pair[1]))
                .collect::<DomainResult<_>>()?,
        };
        Ok(interleave(current, mediants))
    }
}

fn interleave(originals: &[Vector], mediants: Vec<Vector>) -> Vec<Vector> {
    let mut next = Vec::with_capacity(originals.len() + mediants.len());
    for (original, inserted) in originals.iter().zip(mediants) {
        next.push(original.clone());
        next.push(inserted);
    }
    if let Some(last) = originals.last() {
        next.push(last.clone());
    }
    next
}

/// Iterative generation; see [`TreeGenerator::generate`].
pub fn generate(
    basis: &[Vector],
    generations: usize,
    dimensions: usize,
) -> DomainResult<Vec<Vector>> {
    TreeGenerator::new(dimensions).generate(basis, generations)
}

/// Arena-backed recursive generation; see [`TreeGenerator::generate_recursive`].
pub fn generate_recursive(
    basis: &[Vector],
    generations: usize,
    dimensions: usize,
) -> DomainResult<Vec<Vector>> {
    TreeGenerator::new(dimensions).generate_recursive(basis, generations)
}

/// All levels `0..=generations`; see [`TreeGenerator::levels`].
pub fn generate_levels(
    basis: &[Vector],
    generations: usize,
    dimensions: usize,
) -> DomainResult<Vec<TreeLevel>> {
    TreeGenerator::new(dimensions).levels(basis, generations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fractions(pairs: &[(i64, i64)]) -> Vec<Vector> {
        pairs.iter().copied().map(Vector::from).collect()
    }

    #[rstest]
    fn test_generation_zero_is_identity() {
        let basis = stern_brocot_basis();
        assert_eq!(generate(&basis, 0, 2).unwrap(), basis);
    }

    #[rstest]
    fn test_first_generation() {
        let level = generate(&stern_brocot_basis(), 1, 2).unwrap();
        assert_eq!(level, fractions(&[(0, 1), (1, 1), (1, 0)]));
    }

    #[rstest]
    fn test_second_generation() {
        let level = generate(&stern_brocot_basis(), 2, 2).unwrap();
        assert_eq!(level, fractions(&[(0, 1), (1, 2), (1, 1), (2, 1), (1, 0)]));
    }

    #[rstest]
    #[case(2, 0, Some(2))]
    #[case(2, 3, Some(9))]
    #[case(3, 4, Some(33))]
    #[case(1, 5, Some(1))]
    #[case(0, 5, None)]
    #[case(2, 64, None)]
    #[case(3, 63, None)]
    fn test_level_len(#[case] basis_len: usize, #[case] g: usize, #[case] expected: Option<usize>) {
        assert_eq!(level_len(basis_len, g), expected);
    }

    #[rstest]
    fn test_parallel_step_preserves_order() {
        let basis = simplex_basis(3).unwrap();
        let sequential = TreeGenerator::new(3).generate(&basis, 7).unwrap();
        let parallel = TreeGenerator::new(3)
            .with_parallel_threshold(Some(1))
            .generate(&basis, 7)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[rstest]
    fn test_levels_match_generate() {
        let basis = stern_brocot_basis();
        let levels = generate_levels(&basis, 5, 2).unwrap();
        assert_eq!(levels.len(), 6);
        for level in &levels {
            assert_eq!(level.vectors, generate(&basis, level.generation, 2).unwrap());
        }
    }

    #[rstest]
    #[case(vec![Vector::from((0, 1))], 2)]
    #[case(vec![], 2)]
    #[case(stern_brocot_basis(), 3)]
    #[case(stern_brocot_basis(), 1)]
    #[case(vec![Vector::from((0, 1)), Vector::new(vec![1, 0, 0])], 2)]
    fn test_invalid_basis(#[case] basis: Vec<Vector>, #[case] dimensions: usize) {
        let err = generate(&basis, 1, dimensions).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput { .. }));
    }

    #[rstest]
    fn test_level_entries_are_flattened_in_order() {
        let levels = generate_levels(&stern_brocot_basis(), 1, 2).unwrap();
        let entries = level_entries(&levels);
        let pairs: Vec<(usize, String)> = entries
            .iter()
            .map(|e| (e.level, e.vector.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (0, "(0, 1)".to_string()),
                (0, "(1, 0)".to_string()),
                (1, "(0, 1)".to_string()),
                (1, "(1, 1)".to_string()),
                (1, "(1, 0)".to_string()),
            ]
        );
    }
}
