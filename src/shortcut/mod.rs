//! Shortcut resolution - dereferencing records that embed other content.
//!
//! A shortcut record does not hold content of its own; its body is the
//! ordered list of records its reference tokens resolve to, either single
//! content records or whole page subtrees expanded to a bounded depth.

mod core;

pub use core::{ReferenceToken, ShortcutAggregator, ShortcutSpec};
