//! Enumeration of equilibria by negatively indexed pivot paths.
//!
//! From any complementary basis, dropping each label in turn traces a
//! pivot path to another complementary basis (or a ray). Exploring
//! those paths from every newly found basis enumerates all equilibria
//! reachable from the starting one. The exploration is an explicit
//! worklist of cloned machines rather than recursion, so depth is
//! bounded by configuration instead of the call stack, and tableau
//! clones stay cheap through the shared factorization chain.

use crate::error::SolveResult;
use crate::lemke::PathOutcome;
use nashpivot_math::{Bfs, Label, Scalar};
use tracing::debug;

/// Result of positioning a path machine at its starting basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartState {
    /// At a complementary basis that is not itself a solution.
    Ready,
    /// The initial path already produced a solution.
    Solved,
    /// The initial path hit a ray; nothing to enumerate.
    NoSolution,
}

/// A cloneable pivot-path follower the search can steer.
///
/// Implementations: [`LemkeTableau`](crate::lemke::LemkeTableau) for
/// single-tableau LCPs and [`LhTableau`](crate::lemke_howson::LhTableau)
/// for the two-tableau strategic paths.
pub trait PathMachine: Clone {
    /// Scalar the underlying tableaus compute in.
    type Value: Scalar;

    /// Number of droppable labels, numbered `1..=num_labels()`.
    fn num_labels(&self) -> usize;

    /// Move to the starting complementary basis.
    fn start(&mut self) -> SolveResult<StartState>;

    /// Free `label` and follow the resulting path to its end.
    fn drop_label(&mut self, label: Label) -> SolveResult<PathOutcome>;

    /// Signed-label solution map identifying the current basis.
    fn signature(&self) -> Bfs<Self::Value>;

    /// Whether the current basis is lexicographically minimal among
    /// the bases representing this solution.
    fn is_lex_min(&self) -> bool;
}

/// Search limits.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of label drops between the start basis and any
    /// explored basis.
    pub max_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Counters accumulated over one enumeration.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Pivot paths followed.
    pub paths: u64,
    /// Paths that escaped along a ray.
    pub rays: u64,
    /// Complementary bases already seen.
    pub duplicates: u64,
    /// Accepted bases that were not lexicographically minimal.
    pub degenerate: u64,
    /// Distinct solutions visited.
    pub accepted: u64,
}

struct Frame<M> {
    machine: M,
    next_label: Label,
    depth: usize,
}

/// Worklist-driven enumeration over a [`PathMachine`].
pub struct EquilibriumSearch<M: PathMachine> {
    config: SearchConfig,
    seen: Vec<Bfs<M::Value>>,
    stats: SearchStats,
}

impl<M: PathMachine> EquilibriumSearch<M> {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            seen: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Counters for the run so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Record `bfs`; `false` when an equivalent basis was already
    /// visited. Two bases are equivalent when the same signed labels
    /// are basic, whatever their values.
    pub fn on_bfs(&mut self, bfs: &Bfs<M::Value>) -> bool {
        if self.seen.iter().any(|s| s == bfs) {
            self.stats.duplicates += 1;
            false
        } else {
            self.seen.push(bfs.clone());
            true
        }
    }

    /// Enumerate solutions reachable from `start`, calling `visit` at
    /// each new one. `visit` returns `false` to stop early (e.g. an
    /// equilibrium-count limit).
    pub fn run(
        &mut self,
        mut start: M,
        mut visit: impl FnMut(&M) -> bool,
    ) -> SolveResult<()> {
        let total = start.num_labels() as Label;
        let mut stack: Vec<Frame<M>> = Vec::new();
        self.stats.paths += 1;
        match start.start()? {
            StartState::NoSolution => {
                self.stats.rays += 1;
                return Ok(());
            }
            StartState::Ready => {
                self.seen.push(start.signature());
                stack.push(Frame {
                    machine: start,
                    next_label: 1,
                    depth: 0,
                });
            }
            StartState::Solved => {
                let bfs = start.signature();
                if self.on_bfs(&bfs) {
                    self.stats.accepted += 1;
                    if !visit(&start) {
                        return Ok(());
                    }
                    stack.push(Frame {
                        machine: start,
                        next_label: 1,
                        depth: 0,
                    });
                }
            }
        }
        while let Some(frame) = stack.last_mut() {
            if frame.next_label > total || frame.depth >= self.config.max_depth {
                stack.pop();
                continue;
            }
            let label = frame.next_label;
            frame.next_label += 1;
            let depth = frame.depth;
            let mut branch = frame.machine.clone();
            self.stats.paths += 1;
            match branch.drop_label(label)? {
                PathOutcome::Complementary => {
                    let bfs = branch.signature();
                    if self.on_bfs(&bfs) {
                        if !branch.is_lex_min() {
                            // A degenerate vertex whose representative
                            // basis is not the lexicographic one; the
                            // solution itself is still valid.
                            self.stats.degenerate += 1;
                            debug!(label, depth, "degenerate basis accepted");
                        }
                        self.stats.accepted += 1;
                        debug!(label, depth, "new complementary basis");
                        if !visit(&branch) {
                            return Ok(());
                        }
                        stack.push(Frame {
                            machine: branch,
                            next_label: 1,
                            depth: depth + 1,
                        });
                    }
                }
                PathOutcome::Ray => {
                    self.stats.rays += 1;
                    debug!(label, depth, "path escaped on a ray");
                }
                PathOutcome::StepLimit => {
                    debug!(label, depth, "path abandoned at step limit");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A machine with no labels; only `on_bfs` is exercised here.
    #[derive(Clone)]
    struct Inert;

    impl PathMachine for Inert {
        type Value = f64;

        fn num_labels(&self) -> usize {
            0
        }

        fn start(&mut self) -> SolveResult<StartState> {
            Ok(StartState::Ready)
        }

        fn drop_label(&mut self, _label: Label) -> SolveResult<PathOutcome> {
            Ok(PathOutcome::Ray)
        }

        fn signature(&self) -> Bfs<f64> {
            Bfs::new()
        }

        fn is_lex_min(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_on_bfs_rejects_repeated_key_sets() {
        let mut search: EquilibriumSearch<Inert> =
            EquilibriumSearch::new(SearchConfig::default());
        let mut a = Bfs::new();
        a.insert(1, 0.25);
        a.insert(-2, 0.75);
        assert!(search.on_bfs(&a));

        // Same key set, different values: still a duplicate.
        let mut b = Bfs::new();
        b.insert(-2, 0.1);
        b.insert(1, 0.9);
        assert!(!search.on_bfs(&b));
        assert_eq!(search.stats().duplicates, 1);

        let mut c = Bfs::new();
        c.insert(2, 0.5);
        c.insert(1, 0.5);
        assert!(search.on_bfs(&c));
        assert_eq!(search.stats().accepted, 0);
    }
}
