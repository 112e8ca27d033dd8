use std::collections::BTreeMap;

use crate::content::{COLUMN_IN_CONTAINER, ColumnKey, ContentItem, LanguageId, RecordId};
use crate::error::Result;
use crate::overlay::OverlayResolver;
use crate::permit::EffectiveCell;
use crate::schema::LayoutSchema;

/// Ordered content of one grid column.
#[derive(Debug, Clone)]
pub struct ColumnAssignment {
    pub name: String,
    pub items: Vec<ContentItem>,
    /// Items whose language matches the container, measured against
    /// `max_items`.
    pub same_language_count: u32,
    /// `0` means unlimited.
    pub max_items: u32,
    pub effective: EffectiveCell,
}

impl ColumnAssignment {
    /// The column holds as many matching-language items as it may take;
    /// new content should not be offered.
    pub fn at_capacity(&self) -> bool {
        self.max_items > 0 && self.same_language_count >= self.max_items
    }

    /// The column holds more than it may take; render as an error state.
    pub fn over_capacity(&self) -> bool {
        self.max_items > 0 && self.same_language_count > self.max_items
    }

    pub fn item_ids(&self) -> Vec<RecordId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Result of assigning one container's candidates to its grid columns.
#[derive(Debug, Clone, Default)]
pub struct AssignmentResult {
    pub columns: BTreeMap<ColumnKey, ColumnAssignment>,
    /// Records the workspace overlay discarded.
    pub dropped: usize,
    pub single_column: bool,
}

impl AssignmentResult {
    pub fn column(&self, key: ColumnKey) -> Option<&ColumnAssignment> {
        self.columns.get(&key)
    }

    pub fn total_items(&self) -> usize {
        self.columns.values().map(|column| column.items.len()).sum()
    }
}

/// Assign candidate records to the columns of a resolved layout.
///
/// Candidates run through the workspace overlay first. In multi-column
/// mode every declared cell gets the records matching its column key and
/// the target container, sorted by sort order; the sort is stable, so
/// records with equal sort values keep their collection order. In
/// single-column fallback mode the one pseudo-column takes every record
/// parked under the in-container marker, with no capacity limit.
///
/// An empty candidate collection is valid and yields every column empty.
pub fn assign(
    candidates: Vec<ContentItem>,
    schema: &LayoutSchema,
    container_id: RecordId,
    container_language: LanguageId,
    overlay: &OverlayResolver<'_>,
) -> Result<AssignmentResult> {
    let outcome = overlay.resolve_collection(candidates)?;

    let mut columns = BTreeMap::new();
    for cell in schema.cells() {
        let mut items: Vec<ContentItem> = outcome
            .items
            .iter()
            .filter(|item| {
                if schema.is_single_column() {
                    item.column == COLUMN_IN_CONTAINER && item.in_container(container_id)
                } else {
                    item.column == cell.column && item.in_container(container_id)
                }
            })
            .cloned()
            .collect();
        items.sort_by_key(|item| item.sort_order);

        let same_language_count = items
            .iter()
            .filter(|item| item.counts_for_language(container_language))
            .count() as u32;

        columns.insert(
            cell.column,
            ColumnAssignment {
                name: cell.name.clone(),
                items,
                same_language_count,
                max_items: cell.max_items,
                effective: cell.effective.clone(),
            },
        );
    }

    Ok(AssignmentResult {
        columns,
        dropped: outcome.dropped,
        single_column: schema.is_single_column(),
    })
}
