//! Nash equilibrium computation by complementary pivoting.
//!
//! Two solvers over a shared pivoting engine:
//!
//! - [`StrategySolver`]: mixed equilibria of bimatrix games by the
//!   Lemke-Howson algorithm over paired best-response polytopes
//! - [`BehaviorSolver`]: behavior equilibria of two-player extensive
//!   games by Lemke's algorithm over the sequence-form LCP
//!
//! Both enumerate all equilibria reachable by negatively indexed
//! pivot paths through [`EquilibriumSearch`], and both are generic
//! over the tableau precision of `nashpivot-math`: `LuTableau` for
//! fast floating-point runs, `ExactTableau` for exact rational
//! answers.

pub mod behavior;
pub mod config;
pub mod error;
pub mod game;
pub mod lemke;
pub mod lemke_howson;
pub mod profile;
pub mod search;
pub mod strategy;

pub use behavior::BehaviorSolver;
pub use config::SolverConfig;
pub use error::{SolveError, SolveResult};
pub use game::{ExtensiveGame, GameNode, StrategicGame};
pub use lemke::{LemkeTableau, PathOutcome};
pub use lemke_howson::LhTableau;
pub use profile::{BehaviorProfile, MixedProfile};
pub use search::{EquilibriumSearch, PathMachine, SearchConfig, SearchStats, StartState};
pub use strategy::StrategySolver;
