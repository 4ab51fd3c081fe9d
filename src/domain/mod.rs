//! Domain layer: exact-arithmetic mediant trees and continued fractions
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod cont_frac;
pub mod error;
pub mod levels;
pub mod tree;
pub mod vector;

pub use arena::{MediantArena, MediantNode};
pub use cont_frac::{
    convergents, e_cf, sqrt_cf, sqrt_cf_range, ContinuedFraction, Convergent, ConvergentEntry,
};
pub use error::{DomainError, DomainResult};
pub use levels::{split_at_unity, unique_per_level, UnitySplit};
pub use tree::{
    generate, generate_levels, generate_recursive, level_entries, level_len, simplex_basis,
    stern_brocot_basis, LevelEntry, TreeGenerator, TreeLevel,
};
pub use vector::{mediant, Fraction, Vector};
