use std::collections::HashSet;

use crate::content::{ContentItem, LIVE_WORKSPACE, RecordId, VersionState, WorkspaceId};
use crate::error::Result;
use crate::provider::ContentRepository;

/// Resolved collection plus how many records the overlay discarded.
#[derive(Debug, Clone, Default)]
pub struct OverlayOutcome {
    pub items: Vec<ContentItem>,
    pub dropped: usize,
}

/// Resolves baseline records against one workspace.
pub struct OverlayResolver<'a> {
    repo: &'a dyn ContentRepository,
    workspace: WorkspaceId,
}

impl<'a> OverlayResolver<'a> {
    pub fn new(repo: &'a dyn ContentRepository, workspace: WorkspaceId) -> Self {
        Self { repo, workspace }
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    /// Overlay a single record.
    ///
    /// `None` means the record is invisible in this workspace. A missing
    /// move placeholder is not fatal; the record keeps its baseline
    /// position.
    pub fn resolve_item(&self, item: &ContentItem) -> Result<Option<ContentItem>> {
        if item.version_state == VersionState::DeletePlaceholder {
            return Ok(None);
        }
        if self.workspace == LIVE_WORKSPACE {
            if item.version_state.is_versioned() {
                return Ok(None);
            }
            return Ok(Some(item.clone()));
        }
        match item.version_state {
            VersionState::MovePointer | VersionState::MovePlaceholder => {
                Ok(Some(self.with_placeholder_position(item.clone())?))
            }
            _ => Ok(Some(item.clone())),
        }
    }

    /// Overlay a whole candidate collection.
    ///
    /// Move pointers record the id of the record they move; once the whole
    /// collection has been processed, rows carrying such an id are dropped
    /// unless they are the carrier of the move itself, so the vacated
    /// original position never renders alongside the placeholder.
    pub fn resolve_collection(&self, items: Vec<ContentItem>) -> Result<OverlayOutcome> {
        let mut excluded: HashSet<RecordId> = HashSet::new();
        let mut staged: Vec<(ContentItem, bool)> = Vec::with_capacity(items.len());
        let mut dropped = 0;

        for item in items {
            if item.version_state == VersionState::DeletePlaceholder {
                dropped += 1;
                continue;
            }
            if self.workspace == LIVE_WORKSPACE {
                if item.version_state.is_versioned() {
                    dropped += 1;
                } else {
                    staged.push((item, false));
                }
                continue;
            }
            match item.version_state {
                VersionState::MovePointer => {
                    if item.moved_record != 0 {
                        excluded.insert(item.moved_record);
                    }
                    let resolved = self.with_placeholder_position(item)?;
                    staged.push((resolved, true));
                }
                VersionState::MovePlaceholder => {
                    let resolved = self.with_placeholder_position(item)?;
                    staged.push((resolved, true));
                }
                _ => staged.push((item, false)),
            }
        }

        let mut resolved = Vec::with_capacity(staged.len());
        for (item, move_carrier) in staged {
            if !move_carrier && excluded.contains(&item.id) {
                dropped += 1;
                continue;
            }
            resolved.push(item);
        }

        Ok(OverlayOutcome {
            items: resolved,
            dropped,
        })
    }

    fn with_placeholder_position(&self, mut item: ContentItem) -> std::result::Result<ContentItem> {
        if let Some(placeholder) = self.repo.find_move_placeholder(item.id, self.workspace)? {
            item.sort_order = placeholder.sort_order;
            item.column = placeholder.column;
            item.container_id = placeholder.container_id;
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ColumnKey, LanguageId};
    use crate::provider::{ContentRepository, LanguageFilter, ProviderError};

    fn item(id: RecordId, column: ColumnKey, sort_order: i64, state: VersionState) -> ContentItem {
        ContentItem {
            id,
            page_id: 10,
            container_id: 100,
            column,
            language: 0,
            sort_order,
            version_state: state,
            translation_parent: 0,
            moved_record: 0,
            content_type: "text".to_string(),
            list_type: String::new(),
            grid_layout: String::new(),
            hidden: false,
            reference_page: 0,
        }
    }

    #[derive(Default)]
    struct PlaceholderRepo {
        placeholders: Vec<ContentItem>,
    }

    impl ContentRepository for PlaceholderRepo {
        fn find_by_container_and_columns(
            &self,
            _container: RecordId,
            _page: RecordId,
            _columns: &[ColumnKey],
            _language: LanguageFilter,
            _workspace: i64,
        ) -> std::result::Result<Vec<ContentItem>, ProviderError> {
            Ok(Vec::new())
        }

        fn find_by_id(&self, _id: RecordId) -> std::result::Result<Option<ContentItem>, ProviderError> {
            Ok(None)
        }

        fn find_move_placeholder(
            &self,
            id: RecordId,
            _workspace: i64,
        ) -> std::result::Result<Option<ContentItem>, ProviderError> {
            Ok(self.placeholders.iter().find(|p| p.id == id).cloned())
        }

        fn find_translation(
            &self,
            _id: RecordId,
            _language: LanguageId,
        ) -> std::result::Result<Option<ContentItem>, ProviderError> {
            Ok(None)
        }

        fn find_in_pages(
            &self,
            _pages: &[RecordId],
            _exclude: RecordId,
        ) -> std::result::Result<Vec<ContentItem>, ProviderError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn delete_placeholder_always_dropped() {
        let repo = PlaceholderRepo::default();
        for workspace in [0, 3] {
            let resolver = OverlayResolver::new(&repo, workspace);
            let record = item(1, 0, 10, VersionState::DeletePlaceholder);
            assert!(resolver.resolve_item(&record).unwrap().is_none());
            let outcome = resolver.resolve_collection(vec![record]).unwrap();
            assert!(outcome.items.is_empty());
            assert_eq!(outcome.dropped, 1);
        }
    }

    #[test]
    fn live_workspace_drops_all_versioned_records() {
        let repo = PlaceholderRepo::default();
        let resolver = OverlayResolver::new(&repo, 0);
        let outcome = resolver
            .resolve_collection(vec![
                item(1, 0, 10, VersionState::Live),
                item(2, 0, 20, VersionState::NewPlaceholder),
                item(3, 0, 30, VersionState::MovePointer),
            ])
            .unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].id, 1);
        assert_eq!(outcome.dropped, 2);
    }

    #[test]
    fn move_pointer_takes_placeholder_position_and_drops_original() {
        let mut placeholder = item(7, 2, 99, VersionState::MovePlaceholder);
        placeholder.container_id = 200;
        let repo = PlaceholderRepo {
            placeholders: vec![placeholder],
        };
        let resolver = OverlayResolver::new(&repo, 3);

        let mut pointer = item(7, 0, 10, VersionState::MovePointer);
        pointer.moved_record = 7;
        let original = item(7, 0, 10, VersionState::Live);

        let outcome = resolver
            .resolve_collection(vec![original, pointer])
            .unwrap();
        assert_eq!(outcome.items.len(), 1);
        let resolved = &outcome.items[0];
        assert_eq!(resolved.id, 7);
        assert_eq!(resolved.column, 2);
        assert_eq!(resolved.sort_order, 99);
        assert_eq!(resolved.container_id, 200);
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn missing_placeholder_passes_record_through() {
        let repo = PlaceholderRepo::default();
        let resolver = OverlayResolver::new(&repo, 3);
        let mut pointer = item(7, 0, 10, VersionState::MovePointer);
        pointer.moved_record = 7;
        let outcome = resolver.resolve_collection(vec![pointer]).unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].column, 0);
        assert_eq!(outcome.items[0].sort_order, 10);
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn direct_move_placeholder_is_substituted() {
        let mut stored = item(5, 3, 40, VersionState::MovePlaceholder);
        stored.container_id = 100;
        let repo = PlaceholderRepo {
            placeholders: vec![stored],
        };
        let resolver = OverlayResolver::new(&repo, 2);
        let record = item(5, 1, 5, VersionState::MovePlaceholder);
        let resolved = resolver.resolve_item(&record).unwrap().unwrap();
        assert_eq!(resolved.column, 3);
        assert_eq!(resolved.sort_order, 40);
    }
}
