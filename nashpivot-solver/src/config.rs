//! Solver configuration.

use nashpivot_math::TableauConfig;

/// Limits and numeric settings shared by both solvers.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Stop after this many equilibria; `0` enumerates everything
    /// reachable. `1` follows a single path without the search.
    pub stop_after: usize,
    /// Maximum search depth in dropped labels.
    pub max_depth: usize,
    /// Pivot budget per path; `0` picks a bound from the problem size.
    pub max_steps: usize,
    /// Settings forwarded to the tableaus.
    pub tableau: TableauConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            stop_after: 0,
            max_depth: 32,
            max_steps: 0,
            tableau: TableauConfig::default(),
        }
    }
}
