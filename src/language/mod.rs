//! Translation-consistency checks for content creation.
//!
//! Creating standalone records in a language that already holds connected
//! translations produces stale translation states, so the guard blocks the
//! "new content" affordance in that case and raises a warning when both
//! kinds coexist. The guard caches its per-language decision and is
//! scoped to a single resolution pass.

mod core;

pub use core::LanguageGuard;
