//! Exact rational tableau using fraction-free integer elimination.
//!
//! The input system is scaled by `totdenom`, the least common multiple
//! of every input denominator, so that all columns are integer
//! vectors. The current basis inverse is carried as the integer matrix
//! `tabdat` over the running denominator `denom`, and the solution
//! numerators as `coeff`:
//!
//! - `tabdat / denom` equals `totdenom · inv(B')` exactly, where `B'`
//!   is the scaled basis matrix;
//! - `coeff / (denom · totdenom)` equals the true basic solution
//!   exactly.
//!
//! Pivoting applies division-free row updates followed by a gcd
//! normalization pass; every intermediate value is an exact integer,
//! so no rounding error ever accumulates and degeneracy tests are
//! exact.

use crate::basis::{Basis, Label};
use crate::error::{TableauError, TableauResult};
use crate::tableau::{Tableau, TableauConfig};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Exact tableau over `BigRational` input.
#[derive(Debug, Clone)]
pub struct ExactTableau {
    matrix: Vec<Vec<BigRational>>,
    rhs: Vec<BigRational>,
    basis: Basis,
    /// Scaled structural columns, one integer vector per column.
    scaled_cols: Vec<Vec<BigInt>>,
    tabdat: Vec<Vec<BigInt>>,
    coeff: Vec<BigInt>,
    denom: BigInt,
    totdenom: BigInt,
    artificial: Option<(Label, usize)>,
}

/// Scale `value` by `totdenom`, which must clear its denominator.
fn scale_entry(value: &BigRational, totdenom: &BigInt) -> TableauResult<BigInt> {
    let scaled = value * BigRational::from(totdenom.clone());
    if !scaled.is_integer() {
        return Err(TableauError::BadDenom);
    }
    Ok(scaled.to_integer())
}

impl ExactTableau {
    /// The running pivot denominator, always positive.
    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// The input scale: lcm of every input denominator.
    pub fn totdenom(&self) -> &BigInt {
        &self.totdenom
    }

    fn scaled_column(&self, label: Label) -> Vec<BigInt> {
        let rows = self.rows();
        if let Some((art, row)) = &self.artificial {
            if label == *art {
                let mut unit = vec![BigInt::zero(); rows];
                unit[*row] = self.totdenom.clone();
                return unit;
            }
        }
        if label > 0 {
            self.scaled_cols[label as usize - 1].clone()
        } else {
            assert!(label < 0 && (-label) as usize <= rows, "slack label out of range");
            let mut unit = vec![BigInt::zero(); rows];
            unit[(-label) as usize - 1] = self.totdenom.clone();
            unit
        }
    }

    /// `tabdat · column`, the solved-column numerators by position.
    fn solve_numerators(&self, label: Label) -> Vec<BigInt> {
        let column = self.scaled_column(label);
        self.tabdat
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&column)
                    .map(|(t, c)| t * c)
                    .sum::<BigInt>()
            })
            .collect()
    }

    /// Divide `tabdat`, `coeff` and `denom` by their common gcd and
    /// keep `denom` positive.
    fn normalize(&mut self) {
        if self.denom.is_negative() {
            self.denom = -self.denom.clone();
            for row in &mut self.tabdat {
                for entry in row.iter_mut() {
                    *entry = -entry.clone();
                }
            }
            for entry in &mut self.coeff {
                *entry = -entry.clone();
            }
        }
        let mut g = self.denom.clone();
        for row in &self.tabdat {
            for entry in row {
                g = g.gcd(entry);
                if g.is_one() {
                    return;
                }
            }
        }
        for entry in &self.coeff {
            g = g.gcd(entry);
            if g.is_one() {
                return;
            }
        }
        self.denom /= &g;
        for row in &mut self.tabdat {
            for entry in row.iter_mut() {
                *entry /= &g;
            }
        }
        for entry in &mut self.coeff {
            *entry /= &g;
        }
    }

    fn value_at(&self, pos: usize) -> BigRational {
        BigRational::new(self.coeff[pos].clone(), &self.denom * &self.totdenom)
    }
}

impl Tableau for ExactTableau {
    type Value = BigRational;

    fn new(
        matrix: Vec<Vec<BigRational>>,
        rhs: Vec<BigRational>,
        _config: TableauConfig,
    ) -> TableauResult<Self> {
        let rows = matrix.len();
        assert_eq!(rows, rhs.len(), "matrix and rhs row counts differ");
        let cols = matrix.first().map_or(0, Vec::len);

        let mut totdenom = BigInt::one();
        for row in &matrix {
            assert_eq!(row.len(), cols, "ragged constraint matrix");
            for entry in row {
                totdenom = totdenom.lcm(entry.denom());
            }
        }
        for entry in &rhs {
            totdenom = totdenom.lcm(entry.denom());
        }
        if totdenom.is_zero() {
            return Err(TableauError::BadDenom);
        }

        let mut scaled_cols = vec![vec![BigInt::zero(); rows]; cols];
        for (i, row) in matrix.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                scaled_cols[j][i] = scale_entry(entry, &totdenom)?;
            }
        }
        let coeff: Vec<BigInt> = rhs
            .iter()
            .map(|entry| scale_entry(entry, &totdenom))
            .collect::<TableauResult<_>>()?;

        let tabdat = (0..rows)
            .map(|i| {
                (0..rows)
                    .map(|j| if i == j { BigInt::one() } else { BigInt::zero() })
                    .collect()
            })
            .collect();

        Ok(Self {
            matrix,
            rhs,
            basis: Basis::new(rows, cols),
            scaled_cols,
            tabdat,
            coeff,
            denom: BigInt::one(),
            totdenom,
            artificial: None,
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
        self.artificial.as_ref().map(|(label, _)| *label)
    }

    fn column(&self, label: Label) -> Vec<BigRational> {
        let rows = self.rows();
        if let Some((art, row)) = &self.artificial {
            if label == *art {
                let mut unit = vec![BigRational::zero(); rows];
                unit[*row] = BigRational::one();
                return unit;
            }
        }
        if label > 0 {
            let j = label as usize - 1;
            (0..rows).map(|i| self.matrix[i][j].clone()).collect()
        } else {
            assert!(label < 0 && (-label) as usize <= rows, "slack label out of range");
            let mut unit = vec![BigRational::zero(); rows];
            unit[(-label) as usize - 1] = BigRational::one();
            unit
        }
    }

    fn solve_column(&self, label: Label) -> Vec<BigRational> {
        let scale = &self.denom * &self.totdenom;
        self.solve_numerators(label)
            .into_iter()
            .map(|num| BigRational::new(num, scale.clone()))
            .collect()
    }

    fn basis_values(&self) -> Vec<BigRational> {
        (0..self.rows()).map(|pos| self.value_at(pos)).collect()
    }

    fn pivot(&mut self, out_pos: usize, in_label: Label) -> TableauResult<Label> {
        let s = self.solve_numerators(in_label);
        let piv = s[out_pos].clone();
        if piv.is_zero() {
            return Err(TableauError::BadPivot { row: out_pos });
        }

        let row_scale = &self.denom * &self.totdenom;
        let pivot_row: Vec<BigInt> = self.tabdat[out_pos].clone();
        let pivot_coeff = self.coeff[out_pos].clone();
        for pos in 0..self.rows() {
            if pos == out_pos {
                for entry in &mut self.tabdat[pos] {
                    *entry = &row_scale * &*entry;
                }
                self.coeff[pos] = &row_scale * &self.coeff[pos];
            } else {
                let factor = s[pos].clone();
                for (entry, p) in self.tabdat[pos].iter_mut().zip(&pivot_row) {
                    *entry = &piv * &*entry - &factor * p;
                }
                self.coeff[pos] = &piv * &self.coeff[pos] - &factor * &pivot_coeff;
            }
        }
        self.denom = &self.denom * &piv;
        self.normalize();

        Ok(self.basis.pivot(out_pos, in_label))
    }

    fn is_zero(&self, value: &BigRational) -> bool {
        value.is_zero()
    }

    fn is_negative(&self, value: &BigRational) -> bool {
        value.is_negative()
    }

    fn can_pivot(&self, value: &BigRational) -> bool {
        value.is_positive()
    }

    fn ratio_cmp(
        &self,
        a_num: &BigRational,
        a_den: &BigRational,
        b_num: &BigRational,
        b_den: &BigRational,
    ) -> Ordering {
        (a_num * b_den).cmp(&(b_num * a_den))
    }

    fn is_lex_min(&self) -> bool {
        for pos in 0..self.rows() {
            if !self.coeff[pos].is_zero() {
                continue;
            }
            for entry in &self.tabdat[pos] {
                if entry.is_zero() {
                    continue;
                }
                if entry.is_negative() {
                    return false;
                }
                break;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    fn tableau(matrix: Vec<Vec<(i64, i64)>>, rhs: Vec<(i64, i64)>) -> ExactTableau {
        let matrix = matrix
            .into_iter()
            .map(|row| row.into_iter().map(|(n, d)| rat(n, d)).collect())
            .collect();
        let rhs = rhs.into_iter().map(|(n, d)| rat(n, d)).collect();
        ExactTableau::new(matrix, rhs, TableauConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_solution_reproduces_rhs_exactly() {
        let t = tableau(
            vec![vec![(1, 2), (1, 3)], vec![(2, 7), (1, 1)]],
            vec![(3, 2), (5, 7)],
        );
        assert_eq!(t.basis_values(), vec![rat(3, 2), rat(5, 7)]);
    }

    #[test]
    fn test_totdenom_is_lcm() {
        let t = tableau(vec![vec![(1, 2)], vec![(1, 3)]], vec![(1, 1), (0, 1)]);
        assert_eq!(*t.totdenom(), BigInt::from(6));
    }

    #[test]
    fn test_pivot_exact_solution() {
        // x1 enters at row 0: x1 = 3, w2 = 2 - 3/2 = 1/2.
        let mut t = tableau(
            vec![vec![(1, 2), (1, 1)], vec![(1, 4), (1, 1)]],
            vec![(3, 2), (5, 4)],
        );
        let out = t.pivot(0, 1).unwrap();
        assert_eq!(out, -1);
        assert_eq!(t.basis_values(), vec![rat(3, 1), rat(1, 2)]);
    }

    #[test]
    fn test_pivot_then_solve_column_identity() {
        // After x1 becomes basic, its solved column is a unit vector.
        let mut t = tableau(
            vec![vec![(2, 1), (1, 1)], vec![(1, 1), (3, 1)]],
            vec![(4, 1), (5, 1)],
        );
        t.pivot(0, 1).unwrap();
        let y = t.solve_column(1);
        assert_eq!(y, vec![rat(1, 1), rat(0, 1)]);
    }

    #[test]
    fn test_bad_pivot_on_zero_element() {
        let mut t = tableau(vec![vec![(0, 1)], vec![(1, 1)]], vec![(1, 1), (1, 1)]);
        // Column 1 has a zero coefficient in row 0.
        let err = t.pivot(0, 1).unwrap_err();
        assert_eq!(err, TableauError::BadPivot { row: 0 });
    }

    #[test]
    fn test_round_trip_pivots() {
        // Pivot x1 in and back out; the tableau returns to the slack
        // basis with the exact original solution.
        let mut t = tableau(
            vec![vec![(2, 3), (1, 1)], vec![(1, 1), (3, 1)]],
            vec![(4, 1), (5, 1)],
        );
        t.pivot(0, 1).unwrap();
        t.pivot(0, -1).unwrap();
        assert_eq!(t.basis_values(), vec![rat(4, 1), rat(5, 1)]);
        assert_eq!(*t.denom(), BigInt::one());
    }

    #[test]
    fn test_bfs_idempotent() {
        let mut t = tableau(
            vec![vec![(2, 1), (1, 1)], vec![(1, 1), (3, 1)]],
            vec![(4, 1), (5, 1)],
        );
        t.pivot(1, 2).unwrap();
        assert_eq!(t.bfs(), t.bfs());
    }
}
