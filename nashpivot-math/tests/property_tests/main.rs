//! Property-based tests for nashpivot-math
//!
//! This module contains property tests for:
//! - Tableau pivoting correctness under both precisions
//! - Basis bookkeeping across pivot sequences

mod tableau_properties;
