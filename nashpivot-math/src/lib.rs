//! Numeric pivoting core for complementary-pivot equilibrium solvers.
//!
//! This crate provides the linear-algebra layer shared by the Lemke and
//! Lemke-Howson path followers:
//!
//! - [`Basis`]: the bijection between basis row-positions and signed
//!   variable labels
//! - [`Tableau`]: one pivoting protocol with two numeric instantiations
//! - [`LuTableau`]: floating-point tableau with an incremental
//!   product-form factorization ([`LuFactor`])
//! - [`ExactTableau`]: exact rational tableau using fraction-free
//!   integer elimination
//! - [`Bfs`]: sparse basic-feasible-solution maps keyed by signed label
//!
//! The two tableau types behave identically up to precision: the
//! floating tableau applies epsilon tolerances from [`TableauConfig`],
//! the exact tableau compares against zero exactly.

pub mod basis;
pub mod bfs;
pub mod error;
pub mod lu;
pub mod scalar;
pub mod tableau;

pub use basis::{Basis, Label};
pub use bfs::Bfs;
pub use error::{TableauError, TableauResult};
pub use lu::LuFactor;
pub use scalar::Scalar;
pub use tableau::{ExactTableau, LuTableau, Tableau, TableauConfig};
