//! Application layer: services and use cases
//!
//! This layer applies the configured resource budgets and then delegates to the
//! pure domain functions.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{ContinuedFractionService, TreeRequest, TreeService};
