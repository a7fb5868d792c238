//! The shared pivoting protocol and its two numeric instantiations.
//!
//! All path-following control flow is written once against the
//! [`Tableau`] trait and exercised with both implementations:
//!
//! - [`LuTableau`]: `f64` arithmetic, incremental eta-chain
//!   factorization, epsilon-tested comparisons
//! - [`ExactTableau`]: `BigRational` input, fraction-free integer
//!   elimination, exact comparisons

mod exact;
mod float;

pub use exact::ExactTableau;
pub use float::LuTableau;

use crate::basis::{Basis, Label};
use crate::bfs::Bfs;
use crate::error::TableauResult;
use crate::scalar::Scalar;
use num_rational::BigRational;
use std::cmp::Ordering;

/// Numeric configuration passed at tableau construction.
///
/// The floating tableau applies both tolerances; the exact tableau
/// ignores them and compares against zero exactly.
#[derive(Debug, Clone)]
pub struct TableauConfig {
    /// Minimum magnitude accepted for a pivot element (`f64` only).
    pub pivot_tolerance: f64,
    /// Magnitude below which a value is treated as zero (`f64` only).
    pub zero_tolerance: f64,
    /// Eta-chain length triggering refactorization: `0` = automatic,
    /// negative = never.
    pub refactor_every: isize,
}

impl Default for TableauConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1.0e-5,
            zero_tolerance: 1.0e-8,
            refactor_every: 0,
        }
    }
}

/// A pivoting tableau over the constraint system `A·x_struct + w = b`.
///
/// The tableau owns the constraint matrix, right-hand side, current
/// [`Basis`] and solution vector. Columns are addressed uniformly by
/// signed label: the true matrix column for a structural label, a unit
/// vector for a slack label, and a unit vector at the designated row
/// for the artificial label: callers never branch on the case.
pub trait Tableau: Clone {
    /// Scalar type the tableau pivots over.
    type Value: Scalar;

    /// Build a tableau with the initial all-slack basis. Input data is
    /// always exact.
    fn new(
        matrix: Vec<Vec<BigRational>>,
        rhs: Vec<BigRational>,
        config: TableauConfig,
    ) -> TableauResult<Self>
    where
        Self: Sized;

    /// Number of rows (and slack variables).
    fn rows(&self) -> usize;

    /// Number of structural columns, the artificial included while
    /// attached.
    fn cols(&self) -> usize;

    /// Current basis.
    fn basis(&self) -> &Basis;

    /// Mutable access to the basis (marking/unmarking labels).
    fn basis_mut(&mut self) -> &mut Basis;

    /// Attach an artificial column (unit vector at `row`), returning
    /// its label.
    fn set_artificial(&mut self, row: usize) -> Label;

    /// Detach the artificial column. Panics if it is still basic.
    fn clear_artificial(&mut self);

    /// Label of the attached artificial column, if any.
    fn artificial_label(&self) -> Option<Label>;

    /// The column carried by `label`, in original row space.
    fn column(&self, label: Label) -> Vec<Self::Value>;

    /// The basis-solved column carried by `label`, indexed by basis
    /// position.
    fn solve_column(&self, label: Label) -> Vec<Self::Value>;

    /// Current basic solution, indexed by basis position.
    fn basis_values(&self) -> Vec<Self::Value>;

    /// Exchange the basic variable at `out_pos` for `in_label`,
    /// returning the departing label.
    fn pivot(&mut self, out_pos: usize, in_label: Label) -> TableauResult<Label>;

    /// Whether `value` is zero under this tableau's precision.
    fn is_zero(&self, value: &Self::Value) -> bool;

    /// Whether `value` is strictly negative under this tableau's
    /// precision.
    fn is_negative(&self, value: &Self::Value) -> bool;

    /// Whether `value` is strictly positive under this tableau's
    /// precision.
    fn is_positive(&self, value: &Self::Value) -> bool {
        !self.is_zero(value) && !self.is_negative(value)
    }

    /// Whether `value` is large enough to pivot on.
    fn can_pivot(&self, value: &Self::Value) -> bool;

    /// Compare `a_num/a_den` against `b_num/b_den` by cross
    /// multiplication; both denominators must be positive.
    fn ratio_cmp(
        &self,
        a_num: &Self::Value,
        a_den: &Self::Value,
        b_num: &Self::Value,
        b_den: &Self::Value,
    ) -> Ordering;

    /// Lexicographic minimality of the current basic solution, used to
    /// detect degenerate configurations.
    fn is_lex_min(&self) -> bool;

    /// Sparse solution map over the basic structural variables.
    fn bfs(&self) -> Bfs<Self::Value> {
        let values = self.basis_values();
        let mut out = Bfs::new();
        for (pos, value) in values.into_iter().enumerate() {
            let label = self.basis().label_at(pos);
            if label > 0 {
                out.insert(label, value);
            }
        }
        out
    }

    /// Sparse solution map over all basic variables, slack rows
    /// included; used when tableaus of different dimension must be
    /// compared.
    fn bfs_all(&self) -> Bfs<Self::Value> {
        let values = self.basis_values();
        let mut out = Bfs::new();
        for (pos, value) in values.into_iter().enumerate() {
            out.insert(self.basis().label_at(pos), value);
        }
        out
    }
}
