//! Continued fraction service

use tracing::instrument;

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{convergents, e_cf, sqrt_cf, sqrt_cf_range, ContinuedFraction, Convergent};

/// Service for continued fraction expansions within the term budget.
pub struct ContinuedFractionService {
    settings: Settings,
}

impl ContinuedFractionService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Requested length, or the configured default, checked against `max_terms`.
    fn length(&self, requested: Option<usize>) -> ApplicationResult<usize> {
        let length = requested.unwrap_or(self.settings.default_max_length);
        if length > self.settings.max_terms {
            return Err(ApplicationError::budget(
                "term count",
                length,
                self.settings.max_terms,
            ));
        }
        Ok(length)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn sqrt(&self, n: i64, max_length: Option<usize>) -> ApplicationResult<ContinuedFraction> {
        Ok(sqrt_cf(n, self.length(max_length)?)?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn sqrt_range(
        &self,
        from: i64,
        to: i64,
        max_length: Option<usize>,
    ) -> ApplicationResult<Vec<(i64, ContinuedFraction)>> {
        let length = self.length(max_length)?;
        let count = usize::try_from(to.saturating_sub(from)).unwrap_or(0) + 1;
        if count > self.settings.max_terms {
            return Err(ApplicationError::budget(
                "range size",
                count,
                self.settings.max_terms,
            ));
        }
        Ok(sqrt_cf_range(from, to, length)?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn e(&self, limit: Option<usize>) -> ApplicationResult<ContinuedFraction> {
        Ok(e_cf(self.length(limit)?)?)
    }

    #[instrument(level = "debug", skip(self, cf), fields(terms = cf.len()))]
    pub fn convergents(&self, cf: &ContinuedFraction) -> ApplicationResult<Vec<Convergent>> {
        Ok(convergents(cf)?)
    }
}
