//! Error types for tableau and factorization operations.

/// Errors raised by pivot and factorization operations.
///
/// Both conditions indicate an ill-posed system or an internal bug and
/// are propagated to the top-level driver, never silently recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableauError {
    /// Numerically zero pivot element at the given row. Fatal for this
    /// pivot attempt; callers must choose a different pivot.
    BadPivot {
        /// Row position of the rejected pivot.
        row: usize,
    },
    /// Input data not representable in the tracked common denominator.
    BadDenom,
}

impl std::fmt::Display for TableauError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableauError::BadPivot { row } => {
                write!(f, "zero pivot element at row {row}")
            }
            TableauError::BadDenom => {
                write!(f, "input not representable in the common denominator")
            }
        }
    }
}

impl std::error::Error for TableauError {}

/// Result type for tableau operations.
pub type TableauResult<T> = Result<T, TableauError>;
