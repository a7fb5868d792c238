//! Complementary pivoting over a single tableau.
//!
//! [`LemkeTableau`] wraps a [`Tableau`] with the pivot-path primitives:
//! the minimum-ratio exit test, complementary entry selection, and the
//! covering-vector path of Lemke's algorithm for the linear
//! complementarity problem `w = q + Mz + d·z0`.

use crate::error::{SolveError, SolveResult};
use crate::search::{PathMachine, StartState};
use nashpivot_math::{Bfs, Label, Tableau, TableauConfig, TableauResult};
use num_rational::BigRational;
use num_traits::One;
use std::cmp::Ordering;

/// How a pivot path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// The path reached a complementary basis.
    Complementary,
    /// The entering variable was unblocked: the path escapes along a
    /// ray and yields no solution.
    Ray,
    /// The pivot budget ran out before the path terminated.
    StepLimit,
}

/// Deterministic ordering of basic labels used to break ratio ties.
fn label_rank(label: Label) -> (u32, bool) {
    (label.unsigned_abs(), label > 0)
}

/// A tableau together with Lemke-style path state.
#[derive(Debug, Clone)]
pub struct LemkeTableau<T: Tableau> {
    tab: T,
    cover: Option<Label>,
    max_steps: usize,
    pivots: u64,
}

impl<T: Tableau> LemkeTableau<T> {
    /// Wrap the constraint system `A·x + w = b` directly; no covering
    /// column is attached.
    pub fn from_parts(
        matrix: Vec<Vec<BigRational>>,
        rhs: Vec<BigRational>,
        config: TableauConfig,
        max_steps: usize,
    ) -> TableauResult<Self> {
        let rows = matrix.len();
        Ok(Self {
            tab: T::new(matrix, rhs, config)?,
            cover: None,
            max_steps: effective_steps(max_steps, rows),
            pivots: 0,
        })
    }

    /// Build the tableau for `w = q + Mz + d·z0` with the all-ones
    /// covering vector `d` as the last structural column.
    pub fn with_covering(
        m: &[Vec<BigRational>],
        q: Vec<BigRational>,
        config: TableauConfig,
        max_steps: usize,
    ) -> TableauResult<Self> {
        let n = m.len();
        let matrix: Vec<Vec<BigRational>> = m
            .iter()
            .map(|row| {
                let mut out: Vec<BigRational> = row.iter().map(|v| -v).collect();
                out.push(-BigRational::one());
                out
            })
            .collect();
        Ok(Self {
            tab: T::new(matrix, q, config)?,
            cover: Some(n as Label + 1),
            max_steps: effective_steps(max_steps, n),
            pivots: 0,
        })
    }

    /// The underlying tableau.
    pub fn tableau(&self) -> &T {
        &self.tab
    }

    /// Mutable access to the underlying tableau.
    pub fn tableau_mut(&mut self) -> &mut T {
        &mut self.tab
    }

    /// Label of the covering variable, if one is attached.
    pub fn cover_label(&self) -> Option<Label> {
        self.cover
    }

    /// Total pivots performed on this tableau.
    pub fn pivot_count(&self) -> u64 {
        self.pivots
    }

    /// Whether the current basic solution is nonnegative.
    pub fn is_feasible(&self) -> bool {
        self.tab
            .basis_values()
            .iter()
            .all(|v| !self.tab.is_negative(v))
    }

    /// Minimum-ratio exit test for `enter`: the basis position whose
    /// variable hits zero first, ties broken by label order. `None`
    /// means the entering column is unblocked.
    pub fn exit_row(&self, enter: Label) -> Option<usize> {
        let column = self.tab.solve_column(enter);
        let values = self.tab.basis_values();
        let mut best: Option<usize> = None;
        for pos in 0..self.tab.rows() {
            if !self.tab.can_pivot(&column[pos]) {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => match self.tab.ratio_cmp(
                    &values[pos],
                    &column[pos],
                    &values[b],
                    &column[b],
                ) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => {
                        label_rank(self.tab.basis().label_at(pos))
                            < label_rank(self.tab.basis().label_at(b))
                    }
                },
            };
            if better {
                best = Some(pos);
            }
        }
        best
    }

    /// Bring `enter` into the basis at its blocking row. `Ok(None)`
    /// means the column was unblocked and no pivot happened.
    pub fn pivot_in(&mut self, enter: Label) -> SolveResult<Option<Label>> {
        if self.tab.basis().is_blocked(enter) {
            return Ok(None);
        }
        let Some(row) = self.exit_row(enter) else {
            return Ok(None);
        };
        let out = self.tab.pivot(row, enter)?;
        self.pivots += 1;
        Ok(Some(out))
    }

    /// The nonbasic member of the complementary pair `pair` (a positive
    /// structural label). When both members are nonbasic the structural
    /// one is chosen.
    fn nonbasic_of_pair(&self, pair: Label) -> SolveResult<Label> {
        let basis = self.tab.basis();
        if !basis.member(pair) {
            Ok(pair)
        } else if !basis.member(-pair) {
            Ok(-pair)
        } else {
            Err(SolveError::BrokenComplementarity(pair))
        }
    }

    /// First pivot of the covering path: the covering variable enters
    /// at the row of the most negative basic value, making the basis
    /// feasible in one step.
    fn cover_entry(&mut self) -> SolveResult<Label> {
        let cover = self
            .cover
            .ok_or(SolveError::InvalidGame("no covering column attached".into()))?;
        let values = self.tab.basis_values();
        let mut best: Option<usize> = None;
        for (pos, value) in values.iter().enumerate() {
            if !self.tab.is_negative(value) {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => match values[pos].partial_cmp(&values[b]) {
                    Some(Ordering::Less) => true,
                    Some(Ordering::Equal) => {
                        label_rank(self.tab.basis().label_at(pos))
                            < label_rank(self.tab.basis().label_at(b))
                    }
                    _ => false,
                },
            };
            if better {
                best = Some(pos);
            }
        }
        let row = best.ok_or(SolveError::BrokenComplementarity(cover))?;
        let out = self.tab.pivot(row, cover)?;
        self.pivots += 1;
        Ok(out)
    }

    /// Follow the almost-complementary path obtained by freeing the
    /// pair `dup`. Passing the covering label runs the initial Lemke
    /// path from the infeasible slack basis.
    pub fn lcp_path(&mut self, dup: Label) -> SolveResult<PathOutcome> {
        let mut exit = if Some(dup) == self.cover {
            if self.is_feasible() {
                return Ok(PathOutcome::Complementary);
            }
            self.cover_entry()?
        } else {
            let enter = self.nonbasic_of_pair(dup)?;
            match self.pivot_in(enter)? {
                None => return Ok(PathOutcome::Ray),
                Some(out) => out,
            }
        };
        let mut steps = 0usize;
        loop {
            if exit == dup || exit == -dup {
                if Some(dup) == self.cover {
                    // The covering variable never re-enters.
                    self.tab.basis_mut().mark(dup);
                }
                return Ok(PathOutcome::Complementary);
            }
            steps += 1;
            if steps >= self.max_steps {
                return Ok(PathOutcome::StepLimit);
            }
            match self.pivot_in(-exit)? {
                None => return Ok(PathOutcome::Ray),
                Some(out) => exit = out,
            }
        }
    }
}

fn effective_steps(max_steps: usize, n: usize) -> usize {
    if max_steps == 0 {
        (20 * n).max(500)
    } else {
        max_steps
    }
}

impl<T: Tableau> PathMachine for LemkeTableau<T> {
    type Value = T::Value;

    fn num_labels(&self) -> usize {
        self.tab.rows()
    }

    fn start(&mut self) -> SolveResult<StartState> {
        match self.cover {
            None => Ok(StartState::Ready),
            Some(cover) => {
                if self.is_feasible() {
                    return Ok(StartState::Ready);
                }
                match self.lcp_path(cover)? {
                    PathOutcome::Complementary => Ok(StartState::Solved),
                    _ => Ok(StartState::NoSolution),
                }
            }
        }
    }

    fn drop_label(&mut self, label: Label) -> SolveResult<PathOutcome> {
        self.lcp_path(label)
    }

    fn signature(&self) -> Bfs<T::Value> {
        self.tab.bfs_all()
    }

    fn is_lex_min(&self) -> bool {
        self.tab.is_lex_min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nashpivot_math::{ExactTableau, LuTableau};
    use num_bigint::BigInt;

    fn rat(n: i64) -> BigRational {
        BigRational::from(BigInt::from(n))
    }

    fn lcp(m: Vec<Vec<i64>>, q: Vec<i64>) -> LemkeTableau<ExactTableau> {
        let m: Vec<Vec<BigRational>> = m
            .into_iter()
            .map(|row| row.into_iter().map(rat).collect())
            .collect();
        let q = q.into_iter().map(rat).collect();
        LemkeTableau::with_covering(&m, q, TableauConfig::default(), 0).unwrap()
    }

    #[test]
    fn test_feasible_lcp_is_trivial() {
        // q >= 0 solves with z = 0 and no pivots.
        let mut t = lcp(vec![vec![1, 0], vec![0, 1]], vec![1, 2]);
        assert!(t.is_feasible());
        assert_eq!(t.start().unwrap(), StartState::Ready);
        assert_eq!(t.pivot_count(), 0);
    }

    #[test]
    fn test_covering_path_solves_positive_definite_lcp() {
        // M = I, q = (-1, -2): unique solution z = (1, 2), w = 0.
        let mut t = lcp(vec![vec![1, 0], vec![0, 1]], vec![-1, -2]);
        assert_eq!(t.start().unwrap(), StartState::Solved);
        let bfs = t.tableau().bfs();
        assert_eq!(bfs.get(1), Some(&rat(1)));
        assert_eq!(bfs.get(2), Some(&rat(2)));
        // The covering variable has left the basis for good.
        assert!(t.tableau().basis().is_blocked(t.cover_label().unwrap()));
    }

    #[test]
    fn test_degenerate_lcp_with_tied_entry_terminates() {
        // M = I, q = (-1, -1): both basic values tie for the cover
        // entry and the path crosses a zero-ratio pivot, yet it must
        // still terminate at z = (1, 1).
        let mut t = lcp(vec![vec![1, 0], vec![0, 1]], vec![-1, -1]);
        assert_eq!(t.start().unwrap(), StartState::Solved);
        let bfs = t.tableau().bfs();
        assert_eq!(bfs.get(1), Some(&rat(1)));
        assert_eq!(bfs.get(2), Some(&rat(1)));
        assert!(t.tableau().basis().is_blocked(t.cover_label().unwrap()));
    }

    #[test]
    fn test_degenerate_lcp_with_tied_entry_terminates_float() {
        let m: Vec<Vec<BigRational>> = vec![vec![rat(1), rat(0)], vec![rat(0), rat(1)]];
        let q = vec![rat(-1), rat(-1)];
        let mut t: LemkeTableau<LuTableau> =
            LemkeTableau::with_covering(&m, q, TableauConfig::default(), 0).unwrap();
        assert_eq!(t.start().unwrap(), StartState::Solved);
        let bfs = t.tableau().bfs();
        assert!((bfs.get(1).copied().unwrap() - 1.0).abs() < 1e-6);
        assert!((bfs.get(2).copied().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_termination() {
        // M = -I has no blocking row once the cover leaves: ray.
        let mut t = lcp(vec![vec![-1, 0], vec![0, -1]], vec![-1, -2]);
        assert_eq!(t.start().unwrap(), StartState::NoSolution);
    }

    #[test]
    fn test_exit_row_prefers_smallest_ratio() {
        let matrix = vec![vec![rat(1)], vec![rat(2)]];
        let rhs = vec![rat(4), rat(4)];
        let t: LemkeTableau<ExactTableau> =
            LemkeTableau::from_parts(matrix, rhs, TableauConfig::default(), 0).unwrap();
        // Ratios 4/1 vs 4/2: row 1 blocks first.
        assert_eq!(t.exit_row(1), Some(1));
    }

    #[test]
    fn test_exit_row_breaks_ties_by_label_order() {
        // Both rows block at ratio 2; the smaller-magnitude basic
        // label (slack -1) must win deterministically.
        let matrix = vec![vec![rat(1)], vec![rat(1)]];
        let rhs = vec![rat(2), rat(2)];
        let t: LemkeTableau<ExactTableau> =
            LemkeTableau::from_parts(matrix, rhs, TableauConfig::default(), 0).unwrap();
        assert_eq!(t.exit_row(1), Some(0));
    }

    #[test]
    fn test_pivot_in_respects_blocked_labels() {
        let matrix = vec![vec![rat(1)]];
        let rhs = vec![rat(1)];
        let mut t: LemkeTableau<ExactTableau> =
            LemkeTableau::from_parts(matrix, rhs, TableauConfig::default(), 0).unwrap();
        t.tableau_mut().basis_mut().mark(1);
        assert_eq!(t.pivot_in(1).unwrap(), None);
    }
}
