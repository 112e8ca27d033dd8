use serde::{Deserialize, Serialize};

/// Identifier of a persisted record (content item or page).
pub type RecordId = i64;

/// Language identifier. `-1` targets all languages, `0` the default one,
/// positive values address a specific translation.
pub type LanguageId = i64;

/// Workspace identifier. `0` is the live workspace.
pub type WorkspaceId = i64;

/// Column slot inside a grid container, or a page-level region.
pub type ColumnKey = i32;

pub const LANGUAGE_ALL: LanguageId = -1;
pub const LANGUAGE_DEFAULT: LanguageId = 0;
pub const LIVE_WORKSPACE: WorkspaceId = 0;

/// Reserved slot for records that are not assigned to any declared region.
pub const COLUMN_UNASSIGNED: ColumnKey = 32768;

/// Page-level marker for records that live inside a grid container rather
/// than in a page region of their own.
pub const COLUMN_IN_CONTAINER: ColumnKey = -1;

/// Versioning state of a record inside a workspace overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    /// Plain live record, no pending versioning.
    #[default]
    Live,
    /// Placeholder for a record created inside a workspace.
    NewPlaceholder,
    /// Terminal state: the record is deleted once the workspace publishes.
    DeletePlaceholder,
    /// Holds the new position of a moved record.
    MovePlaceholder,
    /// Marks the original slot of a moved record, pointing at the placeholder.
    MovePointer,
}

impl VersionState {
    pub fn code(self) -> i32 {
        match self {
            VersionState::Live => 0,
            VersionState::NewPlaceholder => 1,
            VersionState::DeletePlaceholder => 2,
            VersionState::MovePlaceholder => 3,
            VersionState::MovePointer => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(VersionState::Live),
            1 => Some(VersionState::NewPlaceholder),
            2 => Some(VersionState::DeletePlaceholder),
            3 => Some(VersionState::MovePlaceholder),
            4 => Some(VersionState::MovePointer),
            _ => None,
        }
    }

    /// Any state that only exists as part of a pending workspace change.
    pub fn is_versioned(self) -> bool {
        !matches!(self, VersionState::Live)
    }
}

/// One content record as handed over by the repository.
///
/// The crate never mutates persisted state; overlay resolution works on
/// in-memory copies of these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: RecordId,
    pub page_id: RecordId,
    /// Enclosing grid container, `0` for top-level records.
    pub container_id: RecordId,
    pub column: ColumnKey,
    pub language: LanguageId,
    pub sort_order: i64,
    #[serde(default)]
    pub version_state: VersionState,
    /// `0` marks standalone content, anything else points at the default
    /// language record this one translates.
    #[serde(default)]
    pub translation_parent: RecordId,
    /// On move pointers, the id of the live record whose position moved.
    #[serde(default)]
    pub moved_record: RecordId,
    pub content_type: String,
    #[serde(default)]
    pub list_type: String,
    #[serde(default)]
    pub grid_layout: String,
    #[serde(default)]
    pub hidden: bool,
    /// Page a shortcut reference resolved this record from, if any.
    #[serde(default)]
    pub reference_page: RecordId,
}

impl ContentItem {
    pub fn is_standalone(&self) -> bool {
        self.translation_parent == 0
    }

    pub fn is_translation(&self) -> bool {
        self.translation_parent > 0
    }

    pub fn in_container(&self, container_id: RecordId) -> bool {
        self.container_id == container_id
    }

    /// Whether this record counts toward a container of the given language.
    ///
    /// Records in an all-languages container only count when they belong to
    /// the default language.
    pub fn counts_for_language(&self, container_language: LanguageId) -> bool {
        self.language == container_language
            || (container_language == LANGUAGE_ALL && self.language == LANGUAGE_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(language: LanguageId) -> ContentItem {
        ContentItem {
            id: 1,
            page_id: 10,
            container_id: 0,
            column: 0,
            language,
            sort_order: 0,
            version_state: VersionState::Live,
            translation_parent: 0,
            moved_record: 0,
            content_type: "text".to_string(),
            list_type: String::new(),
            grid_layout: String::new(),
            hidden: false,
            reference_page: 0,
        }
    }

    #[test]
    fn version_state_codes_round_trip() {
        for code in 0..=4 {
            let state = VersionState::from_code(code).unwrap();
            assert_eq!(state.code(), code);
        }
        assert!(VersionState::from_code(5).is_none());
        assert!(VersionState::from_code(-1).is_none());
    }

    #[test]
    fn language_count_rule() {
        assert!(item(2).counts_for_language(2));
        assert!(!item(2).counts_for_language(0));
        assert!(item(LANGUAGE_DEFAULT).counts_for_language(LANGUAGE_ALL));
        assert!(!item(2).counts_for_language(LANGUAGE_ALL));
        assert!(!item(LANGUAGE_ALL).counts_for_language(LANGUAGE_DEFAULT));
    }
}
