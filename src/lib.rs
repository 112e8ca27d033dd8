//! Resolution core for nested, grid-shaped page layouts.
//!
//! Given a flat collection of content records, this crate decides how the
//! records group, order and permission-check inside a declarative grid
//! layout, how a workspace's draft/move/delete overlay changes what a
//! request sees, and how shortcut references expand into ordered content
//! lists. Markup assembly and everything else user-facing happens in the
//! presentation layer consuming the resolved structures.

pub mod assign;
pub mod content;
pub mod error;
pub mod language;
pub mod logging;
pub mod metrics;
pub mod overlay;
pub mod permit;
pub mod provider;
pub mod resolve;
pub mod schema;
pub mod shortcut;

pub use assign::{AssignmentResult, ColumnAssignment, assign};
pub use content::{
    COLUMN_IN_CONTAINER, COLUMN_UNASSIGNED, ColumnKey, ContentItem, LANGUAGE_ALL, LANGUAGE_DEFAULT,
    LIVE_WORKSPACE, LanguageId, RecordId, VersionState, WorkspaceId,
};
pub use error::{ResolveError, Result};
pub use language::LanguageGuard;
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, ResolveMetrics};
pub use overlay::{OverlayOutcome, OverlayResolver};
pub use permit::{
    CONTENT_TYPE_GRID, CONTENT_TYPE_LIST, DimensionRules, EffectiveCell, EffectiveSet, RuleSet,
};
pub use provider::{
    ContentRepository, LanguageFilter, LayoutSource, LoggerWarningSink, NullWarningSink,
    PageTreeService, ProviderError, WarningKind, WarningSink,
};
pub use resolve::{ContainerResolution, PassConfig, ResolvePass};
pub use schema::{
    ColumnDefinition, GridCell, LayoutDefinition, LayoutId, LayoutSchema, RowDefinition,
    RuleStrings, SchemaCache, SchemaError, UNASSIGNED_LABEL,
};
pub use shortcut::{ReferenceToken, ShortcutAggregator, ShortcutSpec};
