//! Content record model shared by every resolver in the crate.
//!
//! Downstream code imports the record types from here while the
//! implementation details live in the private `core` module.

mod core;

pub use core::{
    COLUMN_IN_CONTAINER, COLUMN_UNASSIGNED, ColumnKey, ContentItem, LANGUAGE_ALL, LANGUAGE_DEFAULT,
    LIVE_WORKSPACE, LanguageId, RecordId, VersionState, WorkspaceId,
};
