//! Unified error surface of the crate.

mod types;

pub use types::{ResolveError, Result};
