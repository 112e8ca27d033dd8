//! Content assignment - grouping candidate records into grid columns.
//!
//! Takes the overlaid candidate collection of one container, buckets it by
//! declared column, sorts each bucket and derives the per-column counts
//! the presentation layer needs for capacity handling.

mod core;

pub use core::{AssignmentResult, ColumnAssignment, assign};
