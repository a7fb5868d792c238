//! Two-tableau Lemke-Howson path following for bimatrix games.
//!
//! Each player owns one tableau: player 1's holds the best-response
//! polytope of `x` (rows are player 2's strategies), player 2's the
//! polytope of `y` (rows are player 1's strategies). Every global
//! label `1..=n1+n2` has a carrier in both tableaus, structural in
//! its home tableau and slack in the other, and a pivot path
//! alternates between them: whichever global label leaves one
//! tableau, its carrier in the other tableau enters next.

use crate::error::{SolveError, SolveResult};
use crate::lemke::{LemkeTableau, PathOutcome};
use crate::search::{PathMachine, StartState};
use nashpivot_math::{Bfs, Label, Tableau};
use num_traits::Zero;

/// Paired tableaus walking a Lemke-Howson path.
#[derive(Debug, Clone)]
pub struct LhTableau<T: Tableau> {
    tabs: [LemkeTableau<T>; 2],
    n1: usize,
    n2: usize,
    max_steps: usize,
}

impl<T: Tableau> LhTableau<T> {
    /// Pair the two players' polytope tableaus. `p1` must have one row
    /// per player 2 strategy and one column per player 1 strategy, and
    /// `p2` the transpose shape.
    pub fn new(p1: LemkeTableau<T>, p2: LemkeTableau<T>, max_steps: usize) -> Self {
        let n1 = p1.tableau().cols();
        let n2 = p2.tableau().cols();
        assert_eq!(p1.tableau().rows(), n2, "player 1 tableau shape");
        assert_eq!(p2.tableau().rows(), n1, "player 2 tableau shape");
        let max_steps = if max_steps == 0 {
            (20 * (n1 + n2)).max(500)
        } else {
            max_steps
        };
        Self {
            tabs: [p1, p2],
            n1,
            n2,
            max_steps,
        }
    }

    /// Which tableau carries `global` as a structural column.
    fn home_side(&self, global: Label) -> usize {
        if global <= self.n1 as Label {
            0
        } else {
            1
        }
    }

    /// The carrier of `global` inside tableau `side`.
    fn local_of(&self, side: usize, global: Label) -> Label {
        let n1 = self.n1 as Label;
        match (side, global <= n1) {
            (0, true) => global,
            (0, false) => -(global - n1),
            (_, true) => -global,
            (_, false) => global - n1,
        }
    }

    /// The global label carried by `local` inside tableau `side`.
    fn global_of(&self, side: usize, local: Label) -> Label {
        let n1 = self.n1 as Label;
        match (side, local > 0) {
            (0, true) => local,
            (0, false) => n1 - local,
            (_, true) => n1 + local,
            (_, false) => -local,
        }
    }

    /// Follow the path obtained by dropping `start` (a global label in
    /// `1..=n1+n2`) from the current complementary pair of bases.
    pub fn lemke_path(&mut self, start: Label) -> SolveResult<PathOutcome> {
        let home = self.home_side(start);
        let home_local = self.local_of(home, start);
        let (mut side, mut enter) = if !self.tabs[home].tableau().basis().member(home_local) {
            (home, home_local)
        } else {
            let other = 1 - home;
            let other_local = self.local_of(other, start);
            if self.tabs[other].tableau().basis().member(other_local) {
                return Err(SolveError::BrokenComplementarity(start));
            }
            (other, other_local)
        };
        let mut steps = 0usize;
        loop {
            let Some(out) = self.tabs[side].pivot_in(enter)? else {
                return Ok(PathOutcome::Ray);
            };
            let global = self.global_of(side, out);
            if global == start {
                return Ok(PathOutcome::Complementary);
            }
            steps += 1;
            if steps >= self.max_steps {
                return Ok(PathOutcome::StepLimit);
            }
            side = 1 - side;
            enter = self.local_of(side, global);
            if self.tabs[side].tableau().basis().member(enter) {
                return Err(SolveError::BrokenComplementarity(global));
            }
        }
    }

    /// Unnormalized strategy weights for `player` (0 or 1), indexed by
    /// strategy. Nonbasic strategies are zero.
    pub fn strategy_values(&self, player: usize) -> Vec<T::Value> {
        let n = if player == 0 { self.n1 } else { self.n2 };
        let bfs = self.tabs[player].tableau().bfs();
        (1..=n as Label)
            .map(|i| bfs.get(i).cloned().unwrap_or_else(T::Value::zero))
            .collect()
    }

    /// The tableau of `player` (0 or 1).
    pub fn tableau(&self, player: usize) -> &T {
        self.tabs[player].tableau()
    }
}

impl<T: Tableau> PathMachine for LhTableau<T> {
    type Value = T::Value;

    fn num_labels(&self) -> usize {
        self.n1 + self.n2
    }

    fn start(&mut self) -> SolveResult<StartState> {
        // Both all-slack bases are complementary and feasible; the
        // artificial starting point corresponds to the empty profile.
        Ok(StartState::Ready)
    }

    fn drop_label(&mut self, label: Label) -> SolveResult<PathOutcome> {
        self.lemke_path(label)
    }

    fn signature(&self) -> Bfs<T::Value> {
        // Keys are signed global labels: positive when the label's
        // structural carrier is basic, negative for its slack.
        let mut out = Bfs::new();
        for side in 0..2 {
            for (local, value) in self.tabs[side].tableau().bfs_all().iter() {
                let global = self.global_of(side, local);
                let key = if local > 0 { global } else { -global };
                out.insert(key, value.clone());
            }
        }
        out
    }

    fn is_lex_min(&self) -> bool {
        self.tabs[0].tableau().is_lex_min() && self.tabs[1].tableau().is_lex_min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nashpivot_math::{ExactTableau, TableauConfig};
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn rat(n: i64) -> BigRational {
        BigRational::from(BigInt::from(n))
    }

    fn polytope(matrix: Vec<Vec<i64>>) -> LemkeTableau<ExactTableau> {
        let rows = matrix.len();
        let matrix = matrix
            .into_iter()
            .map(|row| row.into_iter().map(rat).collect())
            .collect();
        let rhs = vec![rat(1); rows];
        LemkeTableau::from_parts(matrix, rhs, TableauConfig::default(), 0).unwrap()
    }

    /// Matching pennies shifted strictly positive: player 1 payoffs
    /// [[3, 1], [1, 3]], player 2 payoffs [[1, 3], [3, 1]].
    fn pennies() -> LhTableau<ExactTableau> {
        // Side 0 rows are player 2's payoffs transposed; side 1 rows
        // are player 1's payoffs.
        let p1 = polytope(vec![vec![1, 3], vec![3, 1]]);
        let p2 = polytope(vec![vec![3, 1], vec![1, 3]]);
        LhTableau::new(p1, p2, 0)
    }

    #[test]
    fn test_label_maps_round_trip() {
        let lh = pennies();
        for global in 1..=4 {
            for side in 0..2 {
                let local = lh.local_of(side, global);
                assert_eq!(lh.global_of(side, local), global);
            }
        }
        assert_eq!(lh.home_side(1), 0);
        assert_eq!(lh.home_side(3), 1);
    }

    #[test]
    fn test_pennies_path_finds_mixed_equilibrium() {
        let mut lh = pennies();
        assert_eq!(lh.start().unwrap(), StartState::Ready);
        assert_eq!(lh.lemke_path(1).unwrap(), PathOutcome::Complementary);
        let x = lh.strategy_values(0);
        let y = lh.strategy_values(1);
        // Unique equilibrium is uniform for both players: equal
        // unnormalized weights.
        assert_eq!(x[0], x[1]);
        assert_eq!(y[0], y[1]);
        assert!(x[0] > rat(0));
        assert!(y[0] > rat(0));
    }

    #[test]
    fn test_every_start_label_reaches_same_equilibrium() {
        for start in 1..=4 {
            let mut lh = pennies();
            assert_eq!(lh.lemke_path(start).unwrap(), PathOutcome::Complementary);
            let x = lh.strategy_values(0);
            assert_eq!(x[0], x[1]);
        }
    }

    #[test]
    fn test_signature_distinguishes_trivial_basis() {
        let mut lh = pennies();
        let trivial = lh.signature();
        lh.lemke_path(1).unwrap();
        assert!(lh.signature() != trivial);
    }
}
