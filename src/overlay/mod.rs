//! Workspace overlay resolution for versioned content records.
//!
//! A workspace layers draft, move and delete states over the baseline
//! records. The resolver derives the record collection a given workspace
//! actually sees: delete placeholders vanish, moved records take their
//! placeholder's position, and the vacated original slots are dropped.

mod core;

pub use core::{OverlayOutcome, OverlayResolver};
