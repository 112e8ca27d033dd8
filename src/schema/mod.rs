//! Layout schema resolution - declarative grid definitions with rows,
//! columns, spans and per-cell allow/deny rules.
//!
//! A persisted layout definition is a loose configuration tree; resolving
//! it validates the shape once, up front, and produces an immutable
//! [`LayoutSchema`] that the assignment engine consumes. Resolved schemas
//! are shared process-wide through the [`SchemaCache`].

mod cache;
mod core;

pub use cache::SchemaCache;
pub use core::{
    ColumnDefinition, GridCell, LayoutDefinition, LayoutId, LayoutSchema, RowDefinition,
    RuleStrings, SchemaError, UNASSIGNED_LABEL,
};
