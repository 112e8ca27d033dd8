use serde_json::json;
use thiserror::Error;

use crate::content::{ColumnKey, ContentItem, LANGUAGE_ALL, LanguageId, RecordId, WorkspaceId};
use crate::logging::{LogEvent, LogFields, LogLevel, Logger};
use crate::schema::{LayoutDefinition, LayoutId};

/// Failure reported by a collaborator. Propagated to the caller
/// unmodified; this crate performs no retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Language restriction applied when querying candidate content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFilter {
    /// Only records of exactly this language.
    Exact(LanguageId),
    /// Records of this language plus all-languages records.
    AllOr(LanguageId),
}

impl LanguageFilter {
    pub fn matches(&self, language: LanguageId) -> bool {
        match *self {
            LanguageFilter::Exact(wanted) => language == wanted,
            LanguageFilter::AllOr(wanted) => language == wanted || language == LANGUAGE_ALL,
        }
    }
}

/// Read access to persisted content records.
pub trait ContentRepository {
    /// Candidate records for one container, restricted to the given column
    /// slots and language filter, workspace restrictions applied.
    fn find_by_container_and_columns(
        &self,
        container: RecordId,
        page: RecordId,
        columns: &[ColumnKey],
        language: LanguageFilter,
        workspace: WorkspaceId,
    ) -> Result<Vec<ContentItem>, ProviderError>;

    fn find_by_id(&self, id: RecordId) -> Result<Option<ContentItem>, ProviderError>;

    /// The move placeholder holding the workspace position of a moved
    /// record, if one exists.
    fn find_move_placeholder(
        &self,
        id: RecordId,
        workspace: WorkspaceId,
    ) -> Result<Option<ContentItem>, ProviderError>;

    fn find_translation(
        &self,
        id: RecordId,
        language: LanguageId,
    ) -> Result<Option<ContentItem>, ProviderError>;

    /// Records living directly on any of the given pages, excluding one id.
    /// Used by shortcut aggregation; the caller re-applies its own ordering.
    fn find_in_pages(
        &self,
        pages: &[RecordId],
        exclude: RecordId,
    ) -> Result<Vec<ContentItem>, ProviderError>;
}

/// Page-tree expansion. Breadth or depth order is up to the
/// implementation but must be stable within one call.
pub trait PageTreeService {
    fn expand_subtree(&self, page: RecordId, depth: u8) -> Result<Vec<RecordId>, ProviderError>;
}

/// Where layout definitions come from.
pub trait LayoutSource {
    fn definition(&self, id: &LayoutId) -> Result<Option<LayoutDefinition>, ProviderError>;
}

/// Advisory warnings surfaced during a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Standalone and translated content coexist in one language.
    MixedTranslations,
}

impl WarningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningKind::MixedTranslations => "mixed_translations",
        }
    }
}

/// Fire-and-forget warning delivery, at most once per language per pass.
pub trait WarningSink {
    fn emit(&self, kind: WarningKind, language: LanguageId);
}

/// Default sink used when nobody listens.
#[derive(Debug, Default)]
pub struct NullWarningSink;

impl WarningSink for NullWarningSink {
    fn emit(&self, _kind: WarningKind, _language: LanguageId) {}
}

/// Sink forwarding warnings into the structured logger.
pub struct LoggerWarningSink {
    logger: Logger,
    target: String,
}

impl LoggerWarningSink {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            target: "pagegrid::warnings".to_string(),
        }
    }

    pub fn with_target(logger: Logger, target: impl Into<String>) -> Self {
        Self {
            logger,
            target: target.into(),
        }
    }
}

impl WarningSink for LoggerWarningSink {
    fn emit(&self, kind: WarningKind, language: LanguageId) {
        let mut fields = LogFields::new();
        fields.insert("kind".to_string(), json!(kind.as_str()));
        fields.insert("language".to_string(), json!(language));
        let event = LogEvent::with_fields(
            LogLevel::Warn,
            self.target.clone(),
            "resolution warning".to_string(),
            fields,
        );
        // delivery is fire-and-forget; a failing sink must not fail the pass
        let _ = self.logger.log_event(event);
    }
}
