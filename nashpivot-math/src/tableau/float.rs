//! Floating-point tableau backed by the incremental factorization.
//!
//! Pivoting pushes one eta update onto the [`LuFactor`] chain and
//! re-solves the right-hand side through it, costing O(m) per pivot
//! instead of a full elimination; periodic refactorization bounds the
//! accumulated floating-point error.

use crate::basis::{Basis, Label};
use crate::error::TableauResult;
use crate::lu::LuFactor;
use crate::scalar::Scalar;
use crate::tableau::{Tableau, TableauConfig};
use num_rational::BigRational;
use std::cmp::Ordering;

/// `f64` tableau with eta-chain basis factorization.
#[derive(Debug, Clone)]
pub struct LuTableau {
    matrix: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    basis: Basis,
    lu: LuFactor,
    solution: Vec<f64>,
    artificial: Option<(Label, usize)>,
    config: TableauConfig,
}

impl LuTableau {
    fn rebuild_factorization(&mut self) -> TableauResult<()> {
        let columns: Vec<Vec<f64>> = (0..self.basis.rows())
            .map(|pos| self.column(self.basis.label_at(pos)))
            .collect();
        self.lu.refactor(&columns)
    }
}

impl Tableau for LuTableau {
    type Value = f64;

    fn new(
        matrix: Vec<Vec<BigRational>>,
        rhs: Vec<BigRational>,
        config: TableauConfig,
    ) -> TableauResult<Self> {
        let rows = matrix.len();
        assert_eq!(rows, rhs.len(), "matrix and rhs row counts differ");
        let cols = matrix.first().map_or(0, Vec::len);
        let matrix: Vec<Vec<f64>> = matrix
            .iter()
            .map(|row| {
                assert_eq!(row.len(), cols, "ragged constraint matrix");
                row.iter().map(f64::from_rational).collect()
            })
            .collect();
        let rhs: Vec<f64> = rhs.iter().map(f64::from_rational).collect();
        let lu = LuFactor::identity(rows, config.refactor_every, config.pivot_tolerance);
        let solution = rhs.clone();
        Ok(Self {
            matrix,
            rhs,
            basis: Basis::new(rows, cols),
            lu,
            solution,
            artificial: None,
            config,
        })
    }

    fn rows(&self) -> usize {
        self.basis.rows()
    }

    fn cols(&self) -> usize {
        self.basis.cols()
    }

    fn basis(&self) -> &Basis {
        &self.basis
    }

    fn basis_mut(&mut self) -> &mut Basis {
        &mut self.basis
    }

    fn set_artificial(&mut self, row: usize) -> Label {
        assert!(row < self.rows(), "artificial row out of range");
        assert!(self.artificial.is_none(), "artificial column already attached");
        let label = self.basis.grow_col();
        self.artificial = Some((label, row));
        label
    }

    fn clear_artificial(&mut self) {
        if self.artificial.take().is_some() {
            self.basis.shrink_col();
        }
    }

    fn artificial_label(&self) -> Option<Label> {
        self.artificial.map(|(label, _)| label)
    }

    fn column(&self, label: Label) -> Vec<f64> {
        let rows = self.rows();
        if let Some((art, row)) = self.artificial {
            if label == art {
                let mut unit = vec![0.0; rows];
                unit[row] = 1.0;
                return unit;
            }
        }
        if label > 0 {
            let j = label as usize - 1;
            assert!(j < self.matrix.first().map_or(0, Vec::len), "structural label out of range");
            (0..rows).map(|i| self.matrix[i][j]).collect()
        } else {
            assert!(label < 0 && (-label) as usize <= rows, "slack label out of range");
            let mut unit = vec![0.0; rows];
            unit[(-label) as usize - 1] = 1.0;
            unit
        }
    }

    fn solve_column(&self, label: Label) -> Vec<f64> {
        self.lu.solution(&self.column(label))
    }

    fn basis_values(&self) -> Vec<f64> {
        self.solution.clone()
    }

    fn pivot(&mut self, out_pos: usize, in_label: Label) -> TableauResult<Label> {
        let column = self.column(in_label);
        self.lu.update(out_pos, &column)?;
        let out = self.basis.pivot(out_pos, in_label);
        if self.lu.wants_refactor() {
            self.rebuild_factorization()?;
        }
        self.solution = self.lu.solution(&self.rhs);
        Ok(out)
    }

    fn is_zero(&self, value: &f64) -> bool {
        value.abs() <= self.config.zero_tolerance
    }

    fn is_negative(&self, value: &f64) -> bool {
        *value < -self.config.zero_tolerance
    }

    fn can_pivot(&self, value: &f64) -> bool {
        *value > self.config.pivot_tolerance
    }

    fn ratio_cmp(&self, a_num: &f64, a_den: &f64, b_num: &f64, b_den: &f64) -> Ordering {
        let diff = a_num * b_den - b_num * a_den;
        if diff.abs() <= self.config.zero_tolerance {
            Ordering::Equal
        } else if diff < 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    fn is_lex_min(&self) -> bool {
        for pos in 0..self.rows() {
            if !self.is_zero(&self.solution[pos]) {
                continue;
            }
            let mut unit = vec![0.0; self.rows()];
            unit[self.lu.row_of(pos)] = 1.0;
            let inverse_row = self.lu.solve_transposed(&unit);
            for entry in &inverse_row {
                if self.is_zero(entry) {
                    continue;
                }
                if *entry < 0.0 {
                    return false;
                }
                break;
            }
        }
        true
    }
}
