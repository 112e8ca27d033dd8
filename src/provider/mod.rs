//! Collaborator contracts consumed by the resolvers.
//!
//! Content retrieval, page-tree expansion, layout lookup and warning
//! delivery all live outside this crate; the resolvers talk to them
//! through these traits. Everything is synchronous by contract - ordering
//! and sorting are evaluated only after a call has returned all its data.

mod core;

pub use core::{
    ContentRepository, LanguageFilter, LayoutSource, LoggerWarningSink, NullWarningSink,
    PageTreeService, ProviderError, WarningKind, WarningSink,
};
