//! Allow/deny rule algebra for grid cells.
//!
//! Each cell carries allow and disallow rules across three dimensions
//! (content type, list type, grid layout). This module computes the
//! effective sets a cell exposes, including the cancellation rule for
//! values that appear on both sides and the generic-marker coupling
//! between the list/grid dimensions and the content-type dimension.

mod core;

pub use core::{
    CONTENT_TYPE_GRID, CONTENT_TYPE_LIST, DimensionRules, EffectiveCell, EffectiveSet, RuleSet,
};
