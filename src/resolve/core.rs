use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::assign::{AssignmentResult, assign};
use crate::content::{
    COLUMN_UNASSIGNED, ColumnKey, ContentItem, LANGUAGE_DEFAULT, LanguageId, WorkspaceId,
};
use crate::error::Result;
use crate::language::LanguageGuard;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::ResolveMetrics;
use crate::overlay::OverlayResolver;
use crate::provider::{
    ContentRepository, LanguageFilter, LayoutSource, PageTreeService, WarningSink,
};
use crate::schema::{LayoutSchema, SchemaCache};
use crate::shortcut::{ShortcutAggregator, ShortcutSpec};

const LOG_TARGET: &str = "pagegrid::resolve";

/// Configuration knobs for one resolution pass.
#[derive(Clone, Default)]
pub struct PassConfig {
    /// Whether the current user may edit content on this page. Only
    /// consumed to decide whether create affordances are surfaced; never
    /// enforced here.
    pub editable: bool,
    /// Site-level override that disables the translation-consistency guard.
    pub allow_inconsistent_language: bool,
    /// Swap shortcut targets for their translations when one exists.
    pub translation_overlay: bool,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Optional shared metrics accumulator.
    pub metrics: Option<Arc<Mutex<ResolveMetrics>>>,
}

impl PassConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ResolveMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ResolveMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Everything the presentation layer needs to render one grid container.
#[derive(Debug, Clone)]
pub struct ContainerResolution {
    pub schema: Arc<LayoutSchema>,
    pub assignment: AssignmentResult,
    /// Per column: whether a create affordance should be offered.
    pub new_content_allowed: BTreeMap<ColumnKey, bool>,
}

/// One resolution pass over one incoming page-render request.
///
/// The pass owns the language guard, which holds decisions rather than
/// facts; do not reuse a pass across requests.
pub struct ResolvePass<'a> {
    repo: &'a dyn ContentRepository,
    layouts: &'a dyn LayoutSource,
    tree: &'a dyn PageTreeService,
    warnings: &'a dyn WarningSink,
    cache: &'a SchemaCache,
    workspace: WorkspaceId,
    config: PassConfig,
    guard: LanguageGuard,
}

impl<'a> ResolvePass<'a> {
    pub fn new(
        repo: &'a dyn ContentRepository,
        layouts: &'a dyn LayoutSource,
        tree: &'a dyn PageTreeService,
        warnings: &'a dyn WarningSink,
        cache: &'a SchemaCache,
        workspace: WorkspaceId,
        config: PassConfig,
    ) -> Self {
        Self {
            repo,
            layouts,
            tree,
            warnings,
            cache,
            workspace,
            config,
            guard: LanguageGuard::new(),
        }
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    /// Resolve one grid container: layout schema, column assignment and
    /// the per-column create decisions.
    pub fn resolve_container(
        &mut self,
        container: &ContentItem,
        container_language: LanguageId,
    ) -> Result<ContainerResolution> {
        let schema = self.schema_for(container)?;

        // an all-languages container still counts its default-language
        // records, so both non-positive targets query {default, all}
        let language_filter = if container_language > 0 {
            LanguageFilter::Exact(container_language)
        } else {
            LanguageFilter::AllOr(LANGUAGE_DEFAULT)
        };
        let candidates = self.repo.find_by_container_and_columns(
            container.id,
            container.page_id,
            &schema.declared_columns(),
            language_filter,
            self.workspace,
        )?;

        let overlay = OverlayResolver::new(self.repo, self.workspace);
        let assignment = assign(
            candidates,
            &schema,
            container.id,
            container_language,
            &overlay,
        )?;

        let mut new_content_allowed = BTreeMap::new();
        for (key, column) in &assignment.columns {
            let blocked = self.guard.creation_blocked(
                &column.items,
                container_language,
                self.config.allow_inconsistent_language,
                self.warnings,
            );
            let allowed = self.config.editable
                && *key != COLUMN_UNASSIGNED
                && !blocked
                && !column.at_capacity();
            new_content_allowed.insert(*key, allowed);
        }

        if let Some(logger) = &self.config.logger {
            let event = event_with_fields(
                LogLevel::Debug,
                LOG_TARGET,
                "container resolved",
                [
                    json_kv("container", container.id),
                    json_kv("layout", schema.id()),
                    json_kv("columns", assignment.columns.len()),
                    json_kv("items", assignment.total_items()),
                    json_kv("dropped", assignment.dropped),
                ],
            );
            let _ = logger.log_event(event);
        }
        if let Some(metrics) = &self.config.metrics {
            let mut metrics = metrics.lock().expect("metrics mutex poisoned");
            metrics.record_container(assignment.total_items(), assignment.dropped);
        }

        Ok(ContainerResolution {
            schema,
            assignment,
            new_content_allowed,
        })
    }

    /// Resolve a shortcut record's references into an ordered content list.
    pub fn resolve_shortcut(&mut self, spec: &ShortcutSpec) -> Result<Vec<ContentItem>> {
        let aggregator = ShortcutAggregator::new(
            self.repo,
            self.tree,
            self.workspace,
            self.config.translation_overlay,
        );
        let resolved = aggregator.resolve(spec)?;

        if let Some(logger) = &self.config.logger {
            let event = event_with_fields(
                LogLevel::Debug,
                LOG_TARGET,
                "shortcut resolved",
                [
                    json_kv("shortcut", spec.referencing_id),
                    json_kv("tokens", spec.tokens.len()),
                    json_kv("items", resolved.len()),
                ],
            );
            let _ = logger.log_event(event);
        }
        if let Some(metrics) = &self.config.metrics {
            let mut metrics = metrics.lock().expect("metrics mutex poisoned");
            metrics.record_shortcut(resolved.len());
        }

        Ok(resolved)
    }

    /// Expose the guard for callers that render affordances outside
    /// `resolve_container`.
    pub fn creation_blocked(
        &mut self,
        existing: &[ContentItem],
        target_language: LanguageId,
    ) -> bool {
        self.guard.creation_blocked(
            existing,
            target_language,
            self.config.allow_inconsistent_language,
            self.warnings,
        )
    }

    fn schema_for(&self, container: &ContentItem) -> Result<Arc<LayoutSchema>> {
        if container.grid_layout.is_empty() {
            return Ok(Arc::new(LayoutSchema::single_column("")));
        }
        match self.layouts.definition(&container.grid_layout)? {
            Some(definition) => {
                let (schema, cache_hit) = self
                    .cache
                    .resolve(&container.grid_layout, &definition)?;
                if let Some(metrics) = &self.config.metrics {
                    let mut metrics = metrics.lock().expect("metrics mutex poisoned");
                    metrics.record_schema_lookup(cache_hit);
                }
                Ok(schema)
            }
            None => Ok(Arc::new(LayoutSchema::single_column(
                container.grid_layout.clone(),
            ))),
        }
    }
}
