use std::collections::HashMap;

use crate::content::{
    COLUMN_UNASSIGNED, ContentItem, LANGUAGE_ALL, LANGUAGE_DEFAULT, LanguageId, RecordId,
    WorkspaceId,
};
use crate::error::Result;
use crate::overlay::OverlayResolver;
use crate::provider::{ContentRepository, PageTreeService};

/// One reference held by a shortcut record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceToken {
    /// A page whose content (and optionally whose subtree's content) is
    /// pulled in.
    Page(RecordId),
    /// A single content record.
    Content(RecordId),
}

impl ReferenceToken {
    /// Parse one persisted token. Bare integers are content references;
    /// unknown prefixes resolve to nothing.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(rest) = token.strip_prefix("pages_") {
            return rest.parse().ok().map(ReferenceToken::Page);
        }
        if let Some(rest) = token.strip_prefix("content_") {
            return rest.parse().ok().map(ReferenceToken::Content);
        }
        if token.contains('_') {
            return None;
        }
        token.parse().ok().map(ReferenceToken::Content)
    }

    /// Parse the persisted comma-separated token list.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',').filter_map(Self::parse).collect()
    }
}

/// A shortcut's reference list plus the context needed to resolve it.
#[derive(Debug, Clone)]
pub struct ShortcutSpec {
    pub tokens: Vec<ReferenceToken>,
    /// Page-subtree expansion depth; `0` keeps every page token flat.
    pub recursion_depth: u8,
    /// The shortcut record itself, never part of its own result.
    pub referencing_id: RecordId,
    pub language: LanguageId,
}

impl ShortcutSpec {
    pub fn new(
        tokens: Vec<ReferenceToken>,
        recursion_depth: u8,
        referencing_id: RecordId,
        language: LanguageId,
    ) -> Self {
        Self {
            tokens,
            recursion_depth,
            referencing_id,
            language,
        }
    }

    /// Spec for a shortcut record and its persisted token string.
    pub fn for_item(item: &ContentItem, records: &str, recursion_depth: u8) -> Self {
        Self::new(
            ReferenceToken::parse_list(records),
            recursion_depth,
            item.id,
            item.language,
        )
    }
}

/// Resolves shortcut specs into ordered content collections.
pub struct ShortcutAggregator<'a> {
    repo: &'a dyn ContentRepository,
    tree: &'a dyn PageTreeService,
    workspace: WorkspaceId,
    /// When enabled, records are swapped for their translation in the
    /// shortcut's own language before the workspace overlay runs.
    translation_overlay: bool,
}

impl<'a> ShortcutAggregator<'a> {
    pub fn new(
        repo: &'a dyn ContentRepository,
        tree: &'a dyn PageTreeService,
        workspace: WorkspaceId,
        translation_overlay: bool,
    ) -> Self {
        Self {
            repo,
            tree,
            workspace,
            translation_overlay,
        }
    }

    /// Resolve the spec into an ordered, possibly empty content list.
    ///
    /// Page tokens contribute their records ordered by subtree traversal,
    /// column and sort order; content tokens contribute in token order.
    /// Collaborator failures propagate unmodified.
    pub fn resolve(&self, spec: &ShortcutSpec) -> Result<Vec<ContentItem>> {
        let overlay = OverlayResolver::new(self.repo, self.workspace);
        let mut collected = Vec::new();
        for token in &spec.tokens {
            match *token {
                ReferenceToken::Page(page) => {
                    self.collect_from_pages(page, spec, &overlay, &mut collected)?;
                }
                ReferenceToken::Content(id) => {
                    self.collect_single(id, spec, &overlay, &mut collected)?;
                }
            }
        }
        Ok(collected)
    }

    fn collect_from_pages(
        &self,
        page: RecordId,
        spec: &ShortcutSpec,
        overlay: &OverlayResolver<'_>,
        collected: &mut Vec<ContentItem>,
    ) -> Result<()> {
        let expanded = if spec.recursion_depth > 0 {
            self.tree.expand_subtree(page, spec.recursion_depth)?
        } else {
            vec![page]
        };

        let mut items = self.repo.find_in_pages(&expanded, spec.referencing_id)?;
        // only explicitly placed records in the default or all-languages
        // language are in range, whatever the repository returned; the
        // reserved unassigned slot does not count as explicit placement
        items.retain(|item| {
            item.column >= 0
                && item.column != COLUMN_UNASSIGNED
                && (item.language == LANGUAGE_DEFAULT || item.language == LANGUAGE_ALL)
                && item.id != spec.referencing_id
        });

        let subtree_position: HashMap<RecordId, usize> = expanded
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        items.sort_by_key(|item| {
            (
                subtree_position
                    .get(&item.page_id)
                    .copied()
                    .unwrap_or(usize::MAX),
                item.column,
                item.sort_order,
            )
        });

        for mut item in items {
            item.reference_page = item.page_id;
            self.push_resolved(item, spec, overlay, collected)?;
        }
        Ok(())
    }

    fn collect_single(
        &self,
        id: RecordId,
        spec: &ShortcutSpec,
        overlay: &OverlayResolver<'_>,
        collected: &mut Vec<ContentItem>,
    ) -> Result<()> {
        if id == spec.referencing_id {
            return Ok(());
        }
        if let Some(item) = self.repo.find_by_id(id)? {
            self.push_resolved(item, spec, overlay, collected)?;
        }
        Ok(())
    }

    fn push_resolved(
        &self,
        mut item: ContentItem,
        spec: &ShortcutSpec,
        overlay: &OverlayResolver<'_>,
        collected: &mut Vec<ContentItem>,
    ) -> Result<()> {
        if self.translation_overlay && spec.language > 0 {
            if let Some(translated) = self.repo.find_translation(item.id, spec.language)? {
                let reference_page = item.reference_page;
                item = translated;
                item.reference_page = reference_page;
            }
        }
        if let Some(resolved) = overlay.resolve_item(&item)? {
            collected.push(resolved);
        }
        Ok(())
    }
}
