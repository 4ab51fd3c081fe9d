//! Mediant tree service
//!
//! Checks the growth law against the configured budget before any vector is
//! allocated, then delegates to the domain generators.

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    level_len, split_at_unity, unique_per_level, MediantArena, TreeGenerator, TreeLevel,
    UnitySplit, Vector,
};

/// Parameters of one tree generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRequest {
    pub basis: Vec<Vector>,
    pub generations: usize,
    pub dimensions: usize,
}

/// Service for generating mediant trees within budget.
pub struct TreeService {
    settings: Settings,
}

impl TreeService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn generator(&self, request: &TreeRequest) -> TreeGenerator {
        TreeGenerator::new(request.dimensions)
            .with_parallel_threshold(self.settings.parallel_threshold)
    }

    /// Rejects requests whose final level would exceed the budget.
    pub fn check_budget(&self, request: &TreeRequest) -> ApplicationResult<usize> {
        if request.generations > self.settings.max_generations {
            return Err(ApplicationError::budget(
                "generations",
                request.generations,
                self.settings.max_generations,
            ));
        }
        match level_len(request.basis.len(), request.generations) {
            Some(len) if len <= self.settings.max_elements => Ok(len),
            Some(len) => Err(ApplicationError::budget(
                "final level size",
                len,
                self.settings.max_elements,
            )),
            None => Err(ApplicationError::budget(
                "final level size",
                format!(
                    "({} - 1) * 2^{} + 1",
                    request.basis.len(),
                    request.generations
                ),
                self.settings.max_elements,
            )),
        }
    }

    /// Levels `0..=generations`.
    #[instrument(level = "debug", skip(self))]
    pub fn levels(&self, request: &TreeRequest) -> ApplicationResult<Vec<TreeLevel>> {
        let expected = self.check_budget(request)?;
        let levels = self
            .generator(request)
            .levels(&request.basis, request.generations)?;
        debug!(expected, "levels generated");
        Ok(levels)
    }

    /// Levels computed with the arena-backed recursive form.
    #[instrument(level = "debug", skip(self))]
    pub fn levels_recursive(&self, request: &TreeRequest) -> ApplicationResult<Vec<TreeLevel>> {
        let tree = self.arena(request)?;
        Ok((0..=request.generations)
            .filter_map(|g| tree.level(g).map(|vectors| TreeLevel::new(g, vectors)))
            .collect())
    }

    /// Newly introduced vectors per level.
    #[instrument(level = "debug", skip(self))]
    pub fn unique_levels(&self, request: &TreeRequest) -> ApplicationResult<Vec<TreeLevel>> {
        Ok(unique_per_level(&self.levels(request)?))
    }

    /// Fractions below and above 1, per level.
    #[instrument(level = "debug", skip(self))]
    pub fn split(&self, request: &TreeRequest) -> ApplicationResult<UnitySplit> {
        Ok(split_at_unity(&self.levels(request)?)?)
    }

    /// The full arena, for structural display.
    #[instrument(level = "debug", skip(self))]
    pub fn arena(&self, request: &TreeRequest) -> ApplicationResult<MediantArena> {
        self.check_budget(request)?;
        Ok(MediantArena::grow(
            &request.basis,
            request.generations,
            request.dimensions,
        )?)
    }
}
