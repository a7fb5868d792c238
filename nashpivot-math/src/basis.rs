//! Basis bookkeeping: the bijection between row positions and labels.

use rustc_hash::FxHashSet;

/// Signed variable label.
///
/// Positive labels `1..=n` denote structural columns, negative labels
/// `-1..=-m` denote slack/row variables. Label `k` and `-k` form a
/// complementary pair in the LCP engines built on top of this crate.
pub type Label = i32;

/// Bijection between basis row-positions and signed variable labels.
///
/// Exactly one label occupies each of the `m` positions; the inverse
/// maps are kept in sync on every pivot. Pivoting with a label outside
/// the valid structural/slack range, or with a label that is already
/// basic, is a programming-invariant violation and panics.
#[derive(Debug, Clone)]
pub struct Basis {
    rows: usize,
    cols: usize,
    /// Position -> label.
    labels: Vec<Label>,
    /// Structural label -> position (index `label - 1`).
    col_pos: Vec<Option<usize>>,
    /// Slack label -> position (index `-label - 1`).
    slack_pos: Vec<Option<usize>>,
    /// Labels excluded from re-entering the basis.
    blocked: FxHashSet<Label>,
}

impl Basis {
    /// Create a slack basis: position `i` holds label `-(i+1)`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            labels: (0..rows).map(|i| -(i as Label) - 1).collect(),
            col_pos: vec![None; cols],
            slack_pos: (0..rows).map(Some).collect(),
            blocked: FxHashSet::default(),
        }
    }

    /// Number of row positions.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of structural columns currently addressable.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Extend the structural range by one column, returning its label.
    ///
    /// Used when a tableau attaches an artificial column.
    pub fn grow_col(&mut self) -> Label {
        self.cols += 1;
        self.col_pos.push(None);
        self.cols as Label
    }

    /// Drop the last structural column. Panics if it is basic.
    pub fn shrink_col(&mut self) {
        let label = self.cols as Label;
        assert!(
            !self.member(label),
            "cannot drop basic column {label} from the basis"
        );
        self.col_pos.pop();
        self.blocked.remove(&label);
        self.cols -= 1;
    }

    fn check_label(&self, label: Label) {
        let ok = (label > 0 && label as usize <= self.cols)
            || (label < 0 && (-label) as usize <= self.rows);
        assert!(ok, "label {label} outside the structural/slack range");
    }

    /// Whether `label` is currently basic.
    pub fn member(&self, label: Label) -> bool {
        self.find(label).is_some()
    }

    /// Position of `label` in the basis, if basic.
    pub fn find(&self, label: Label) -> Option<usize> {
        if label > 0 {
            self.col_pos.get(label as usize - 1).copied().flatten()
        } else if label < 0 {
            self.slack_pos.get((-label) as usize - 1).copied().flatten()
        } else {
            None
        }
    }

    /// Label held at `pos`.
    pub fn label_at(&self, pos: usize) -> Label {
        self.labels[pos]
    }

    /// Swap the basic variable at `out_pos` for `in_label`, returning
    /// the departing label.
    pub fn pivot(&mut self, out_pos: usize, in_label: Label) -> Label {
        assert!(out_pos < self.rows, "basis position {out_pos} out of range");
        self.check_label(in_label);
        assert!(
            !self.member(in_label),
            "label {in_label} is already basic"
        );

        let out_label = self.labels[out_pos];
        if out_label > 0 {
            self.col_pos[out_label as usize - 1] = None;
        } else {
            self.slack_pos[(-out_label) as usize - 1] = None;
        }
        if in_label > 0 {
            self.col_pos[in_label as usize - 1] = Some(out_pos);
        } else {
            self.slack_pos[(-in_label) as usize - 1] = Some(out_pos);
        }
        self.labels[out_pos] = in_label;
        out_label
    }

    /// Exclude `label` from re-entering the basis.
    pub fn mark(&mut self, label: Label) {
        self.check_label(label);
        self.blocked.insert(label);
    }

    /// Allow a previously marked `label` to enter again.
    pub fn unmark(&mut self, label: Label) {
        self.blocked.remove(&label);
    }

    /// Whether `label` is excluded from entering the basis.
    pub fn is_blocked(&self, label: Label) -> bool {
        self.blocked.contains(&label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack_basis() {
        let basis = Basis::new(3, 2);
        assert_eq!(basis.label_at(0), -1);
        assert_eq!(basis.label_at(2), -3);
        assert!(basis.member(-2));
        assert!(!basis.member(1));
        assert_eq!(basis.find(-3), Some(2));
    }

    #[test]
    fn test_pivot_membership() {
        let mut basis = Basis::new(3, 2);
        let out = basis.pivot(1, 2);
        assert_eq!(out, -2);
        assert!(basis.member(2));
        assert_eq!(basis.find(2), Some(1));
        assert!(!basis.member(-2));
        assert_eq!(basis.label_at(1), 2);
    }

    #[test]
    #[should_panic(expected = "outside the structural/slack range")]
    fn test_pivot_out_of_range_label() {
        let mut basis = Basis::new(2, 2);
        basis.pivot(0, 5);
    }

    #[test]
    #[should_panic(expected = "already basic")]
    fn test_pivot_already_basic() {
        let mut basis = Basis::new(2, 2);
        basis.pivot(0, -2);
    }

    #[test]
    fn test_mark_unmark() {
        let mut basis = Basis::new(2, 2);
        basis.mark(1);
        assert!(basis.is_blocked(1));
        basis.unmark(1);
        assert!(!basis.is_blocked(1));
    }

    #[test]
    fn test_grow_shrink() {
        let mut basis = Basis::new(2, 2);
        let art = basis.grow_col();
        assert_eq!(art, 3);
        basis.pivot(0, art);
        assert!(basis.member(3));
        basis.pivot(0, -1);
        basis.shrink_col();
        assert_eq!(basis.cols(), 2);
    }
}
