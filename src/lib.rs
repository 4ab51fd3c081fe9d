//! # mediant
//!
//! Exact-arithmetic generators for two related number-theoretic structures:
//!
//! - the Stern-Brocot mediant tree, and its n-dimensional generalisation over
//!   integer vectors ([`domain::TreeGenerator`], [`domain::MediantArena`]),
//!   with per-level deduplication ([`domain::unique_per_level`]);
//! - simple continued fractions of `sqrt(n)` and of `e`, with their exact
//!   convergents ([`domain::sqrt_cf`], [`domain::e_cf`], [`domain::convergents`]).
//!
//! ```rust
//! use mediant::domain::{generate, stern_brocot_basis, e_cf, Vector};
//!
//! let level = generate(&stern_brocot_basis(), 1, 2)?;
//! assert_eq!(level, vec![Vector::from((0, 1)), Vector::from((1, 1)), Vector::from((1, 0))]);
//!
//! let cf = e_cf(7)?;
//! assert_eq!(cf.terms(), &[2, 1, 2, 1, 1, 4, 1]);
//! # Ok::<(), mediant::domain::DomainError>(())
//! ```
//!
//! Tree size doubles with every generation: `(len(basis) - 1) * 2^g + 1`.
//! [`domain::level_len`] computes it up front so callers can bound `g`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
