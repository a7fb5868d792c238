//! Incremental basis factorization as a persistent eta-matrix chain.
//!
//! The basis inverse is never materialized: it is represented as an
//! ordered product of elementary eta matrices, one per column
//! replacement, rebuilt from scratch when the chain grows past the
//! configured length. The chain is a structurally shared `Arc` list,
//! so cloning a tableau for a search branch is O(1) and the shared
//! prefix is reused until either copy refactors.

use crate::error::{TableauError, TableauResult};
use std::sync::Arc;

/// One elementary column-replacement update.
#[derive(Debug, Clone)]
struct EtaMatrix {
    /// Pivot row this eta acts on.
    row: usize,
    /// Replacement column: `1/piv` at `row`, `-y_i/piv` elsewhere.
    column: Vec<f64>,
}

#[derive(Debug)]
struct EtaNode {
    eta: EtaMatrix,
    prev: Option<Arc<EtaNode>>,
    depth: usize,
}

/// Product-form factorization of the basis matrix.
#[derive(Debug, Clone)]
pub struct LuFactor {
    dim: usize,
    chain: Option<Arc<EtaNode>>,
    /// Basis position -> pivot row chosen for that position.
    row_of: Vec<usize>,
    /// Chain length triggering a refactorization: `0` = automatic
    /// threshold, negative = never refactor.
    refactor_every: isize,
    pivot_tolerance: f64,
}

impl LuFactor {
    /// Identity factorization for an initial slack basis.
    pub fn identity(dim: usize, refactor_every: isize, pivot_tolerance: f64) -> Self {
        Self {
            dim,
            chain: None,
            row_of: (0..dim).collect(),
            refactor_every,
            pivot_tolerance,
        }
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of eta updates since the last refactorization.
    pub fn chain_len(&self) -> usize {
        self.chain.as_ref().map_or(0, |node| node.depth)
    }

    fn etas_oldest_first(&self) -> Vec<&EtaMatrix> {
        let mut etas = Vec::with_capacity(self.chain_len());
        let mut cur = self.chain.as_deref();
        while let Some(node) = cur {
            etas.push(&node.eta);
            cur = node.prev.as_deref();
        }
        etas.reverse();
        etas
    }

    /// Apply the chain to `rhs`, yielding the solved vector in row
    /// space.
    pub fn solve(&self, rhs: &[f64]) -> Vec<f64> {
        let mut v = rhs.to_vec();
        for eta in self.etas_oldest_first() {
            let t = v[eta.row];
            if t != 0.0 {
                for (i, &e) in eta.column.iter().enumerate() {
                    if i == eta.row {
                        v[i] = t * e;
                    } else {
                        v[i] += t * e;
                    }
                }
            }
        }
        v
    }

    /// Apply the transposed chain to `rhs`.
    pub fn solve_transposed(&self, rhs: &[f64]) -> Vec<f64> {
        let mut v = rhs.to_vec();
        let etas = self.etas_oldest_first();
        for eta in etas.into_iter().rev() {
            v[eta.row] = eta.column.iter().enumerate().map(|(i, &e)| e * v[i]).sum();
        }
        v
    }

    /// Solved vector indexed by basis position.
    pub fn solution(&self, rhs: &[f64]) -> Vec<f64> {
        let v = self.solve(rhs);
        self.row_of.iter().map(|&r| v[r]).collect()
    }

    /// Pivot row assigned to basis position `pos`.
    pub fn row_of(&self, pos: usize) -> usize {
        self.row_of[pos]
    }

    fn push_eta(&mut self, row: usize, solved: &[f64]) -> TableauResult<()> {
        let piv = solved[row];
        if piv.abs() <= self.pivot_tolerance {
            return Err(TableauError::BadPivot { row });
        }
        let column = solved
            .iter()
            .enumerate()
            .map(|(i, &y)| if i == row { 1.0 / piv } else { -y / piv })
            .collect();
        let depth = self.chain_len() + 1;
        self.chain = Some(Arc::new(EtaNode {
            eta: EtaMatrix { row, column },
            prev: self.chain.take(),
            depth,
        }));
        Ok(())
    }

    /// Append one eta update replacing the column at basis position
    /// `pos` with `column` (given in original row space).
    pub fn update(&mut self, pos: usize, column: &[f64]) -> TableauResult<()> {
        let solved = self.solve(column);
        self.push_eta(self.row_of[pos], &solved)
    }

    /// Whether the chain has reached the refactorization threshold.
    pub fn wants_refactor(&self) -> bool {
        if self.refactor_every < 0 {
            return false;
        }
        let threshold = if self.refactor_every == 0 {
            (2 * self.dim).max(20)
        } else {
            self.refactor_every as usize
        };
        self.chain_len() >= threshold
    }

    /// Rebuild the factorization from the current basis columns, given
    /// by position and in original row space.
    pub fn refactor(&mut self, columns: &[Vec<f64>]) -> TableauResult<()> {
        assert_eq!(columns.len(), self.dim, "refactor needs one column per position");
        self.chain = None;
        let mut used = vec![false; self.dim];
        let mut row_of = vec![0usize; self.dim];
        for (pos, column) in columns.iter().enumerate() {
            let solved = self.solve(column);
            let mut best: Option<usize> = None;
            for (row, &y) in solved.iter().enumerate() {
                if !used[row] && best.map_or(true, |b| y.abs() > solved[b].abs()) {
                    best = Some(row);
                }
            }
            let row = best.ok_or(TableauError::BadPivot { row: pos })?;
            self.push_eta(row, &solved)
                .map_err(|_| TableauError::BadPivot { row: pos })?;
            used[row] = true;
            row_of[pos] = row;
        }
        self.row_of = row_of;
        Ok(())
    }
}
