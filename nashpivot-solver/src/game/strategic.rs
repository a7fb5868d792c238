//! Two-player strategic-form (bimatrix) games.

use crate::error::{SolveError, SolveResult};
use num_rational::BigRational;
use num_traits::Zero;

/// A bimatrix game: one exact payoff per player per strategy pair.
#[derive(Debug, Clone)]
pub struct StrategicGame {
    rows: usize,
    cols: usize,
    /// Row-major `[player 1, player 2]` payoffs.
    payoffs: Vec<[BigRational; 2]>,
}

impl StrategicGame {
    /// Build from per-player payoff tables; both must be nonempty and
    /// of identical shape.
    pub fn new(
        payoffs1: Vec<Vec<BigRational>>,
        payoffs2: Vec<Vec<BigRational>>,
    ) -> SolveResult<Self> {
        let rows = payoffs1.len();
        if rows == 0 || payoffs1[0].is_empty() {
            return Err(SolveError::InvalidGame("empty payoff table".into()));
        }
        let cols = payoffs1[0].len();
        if payoffs2.len() != rows {
            return Err(SolveError::InvalidGame(
                "payoff tables differ in row count".into(),
            ));
        }
        let mut payoffs = Vec::with_capacity(rows * cols);
        for (row1, row2) in payoffs1.into_iter().zip(payoffs2) {
            if row1.len() != cols || row2.len() != cols {
                return Err(SolveError::InvalidGame("ragged payoff table".into()));
            }
            for (a, b) in row1.into_iter().zip(row2) {
                payoffs.push([a, b]);
            }
        }
        Ok(Self {
            rows,
            cols,
            payoffs,
        })
    }

    /// Number of pure strategies of `player` (0 or 1).
    pub fn strategies(&self, player: usize) -> usize {
        if player == 0 {
            self.rows
        } else {
            self.cols
        }
    }

    /// Payoff to `player` at the pure profile `(row, col)`.
    pub fn payoff(&self, row: usize, col: usize, player: usize) -> &BigRational {
        &self.payoffs[row * self.cols + col][player]
    }

    /// Smallest payoff in either table.
    pub fn min_payoff(&self) -> BigRational {
        self.payoffs
            .iter()
            .flat_map(|pair| pair.iter())
            .min()
            .cloned()
            .unwrap_or_else(BigRational::zero)
    }
}
