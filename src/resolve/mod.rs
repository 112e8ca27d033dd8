//! Request-scoped resolution passes.
//!
//! A [`ResolvePass`] wires the schema cache, the content repository and
//! the assignment engine together for one page-render request, carrying
//! the pass-scoped language guard and optional logging/metrics along.

mod core;

pub use core::{ContainerResolution, PassConfig, ResolvePass};
