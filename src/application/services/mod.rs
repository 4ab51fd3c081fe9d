//! Application services

mod cont_frac;
mod tree;

pub use cont_frac::ContinuedFractionService;
pub use tree::{TreeRequest, TreeService};
