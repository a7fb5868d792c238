//! Property-based tests for the pivoting tableaus
//!
//! This module tests:
//! - Exact solutions satisfy the original constraint system
//! - Pivoting in and back out restores the starting solution
//! - Floating-point and exact tableaus agree on the same pivots

use nashpivot_math::{ExactTableau, LuTableau, Scalar, Tableau, TableauConfig};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use proptest::prelude::*;

/// Strategy for small strictly positive coefficients, keeping bases
/// well conditioned for the float comparison.
fn coeff_strategy() -> impl Strategy<Value = i64> {
    1i64..6i64
}

fn rat(n: i64) -> BigRational {
    BigRational::from(BigInt::from(n))
}

/// Square matrix of the given dimension with entries from
/// `coeff_strategy`, plus a nonnegative right-hand side.
fn system_strategy(dim: usize) -> impl Strategy<Value = (Vec<Vec<i64>>, Vec<i64>)> {
    (
        prop::collection::vec(prop::collection::vec(coeff_strategy(), dim), dim),
        prop::collection::vec(0i64..8i64, dim),
    )
}

fn exact(matrix: &[Vec<i64>], rhs: &[i64]) -> ExactTableau {
    let matrix = matrix
        .iter()
        .map(|row| row.iter().copied().map(rat).collect())
        .collect();
    let rhs = rhs.iter().copied().map(rat).collect();
    ExactTableau::new(matrix, rhs, TableauConfig::default()).unwrap()
}

fn float(matrix: &[Vec<i64>], rhs: &[i64]) -> LuTableau {
    let matrix = matrix
        .iter()
        .map(|row| row.iter().copied().map(rat).collect())
        .collect();
    let rhs = rhs.iter().copied().map(rat).collect();
    LuTableau::new(matrix, rhs, TableauConfig::default()).unwrap()
}

/// Pivot structural labels `1..=dim` into successive rows wherever the
/// solved column allows it, recording the pivots applied.
fn pivot_structurals(t: &mut ExactTableau, dim: usize) -> Vec<(usize, i32)> {
    let mut applied = Vec::new();
    for j in 1..=dim as i32 {
        if t.basis().member(j) {
            continue;
        }
        let column = t.solve_column(j);
        let pos = (0..dim).find(|&p| t.can_pivot(&column[p]));
        if let Some(pos) = pos {
            t.pivot(pos, j).unwrap();
            applied.push((pos, j));
        }
    }
    applied
}

proptest! {
    /// Whatever basis a pivot sequence reaches, the basic values still
    /// solve the original system exactly: sum of basic columns scaled
    /// by their values reproduces the right-hand side.
    #[test]
    fn exact_solution_satisfies_system((matrix, rhs) in system_strategy(3)) {
        let mut t = exact(&matrix, &rhs);
        pivot_structurals(&mut t, 3);
        let values = t.basis_values();
        for i in 0..3 {
            let mut total = BigRational::zero();
            for pos in 0..3 {
                let column = t.column(t.basis().label_at(pos));
                total += &column[i] * &values[pos];
            }
            prop_assert_eq!(total, rat(rhs[i]));
        }
    }

    /// Entering a column and immediately leaving through the same row
    /// restores the slack solution bit for bit.
    #[test]
    fn exact_pivot_round_trip((matrix, rhs) in system_strategy(2)) {
        let mut t = exact(&matrix, &rhs);
        let before = t.basis_values();
        let column = t.solve_column(1);
        prop_assume!(t.can_pivot(&column[0]));
        t.pivot(0, 1).unwrap();
        t.pivot(0, -1).unwrap();
        prop_assert_eq!(t.basis_values(), before);
    }

    /// The floating tableau tracks the exact one through the same
    /// pivot sequence.
    #[test]
    fn float_matches_exact((matrix, rhs) in system_strategy(3)) {
        let mut e = exact(&matrix, &rhs);
        let mut f = float(&matrix, &rhs);
        for (pos, label) in pivot_structurals(&mut e, 3) {
            f.pivot(pos, label).unwrap();
        }
        let exact_values = e.basis_values();
        let float_values = f.basis_values();
        for (ev, fv) in exact_values.iter().zip(&float_values) {
            let ev = f64::from_rational(ev);
            prop_assert!((ev - fv).abs() < 1.0e-6, "{} vs {}", ev, fv);
        }
    }

    /// Basis bookkeeping: every label reported basic is found at the
    /// position that reports it.
    #[test]
    fn basis_positions_consistent((matrix, rhs) in system_strategy(3)) {
        let mut t = exact(&matrix, &rhs);
        pivot_structurals(&mut t, 3);
        for pos in 0..3 {
            let label = t.basis().label_at(pos);
            prop_assert!(t.basis().member(label));
            prop_assert_eq!(t.basis().find(label), Some(pos));
        }
    }
}
