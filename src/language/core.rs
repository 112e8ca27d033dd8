use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::content::{ContentItem, LANGUAGE_ALL, LANGUAGE_DEFAULT, LanguageId};
use crate::provider::{WarningKind, WarningSink};

#[derive(Debug, Default, Clone, Copy)]
struct LanguageFlags {
    has_standalone: bool,
    has_translations: bool,
}

/// Pass-scoped guard deciding whether new content may be created in a
/// language.
///
/// Holds decisions, not facts: the per-language cache and the warn-once
/// behavior are only valid within one resolution pass. Build a fresh
/// guard per request.
#[derive(Debug, Default)]
pub struct LanguageGuard {
    languages: HashMap<LanguageId, LanguageFlags>,
}

impl LanguageGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` means creating new content in `target` is blocked.
    ///
    /// The default and all-languages targets are never blocked, nor is
    /// anything when the caller permits inconsistent language handling;
    /// items are not even inspected then. The first call for a specific
    /// language classifies the given records by translation parent and
    /// emits at most one mixed-translations warning; later calls for the
    /// same language reuse the cached classification.
    pub fn creation_blocked(
        &mut self,
        existing: &[ContentItem],
        target: LanguageId,
        override_permitted: bool,
        warnings: &dyn WarningSink,
    ) -> bool {
        if target == LANGUAGE_DEFAULT || target == LANGUAGE_ALL || override_permitted {
            return false;
        }

        let flags = match self.languages.entry(target) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut flags = LanguageFlags::default();
                for item in existing {
                    if item.is_standalone() {
                        flags.has_standalone = true;
                    }
                    if item.is_translation() {
                        flags.has_translations = true;
                    }
                }
                if flags.has_standalone && flags.has_translations {
                    warnings.emit(WarningKind::MixedTranslations, target);
                }
                *entry.insert(flags)
            }
        };

        flags.has_translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{RecordId, VersionState};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        emitted: RefCell<Vec<(WarningKind, LanguageId)>>,
    }

    impl WarningSink for RecordingSink {
        fn emit(&self, kind: WarningKind, language: LanguageId) {
            self.emitted.borrow_mut().push((kind, language));
        }
    }

    fn item(id: RecordId, translation_parent: RecordId) -> ContentItem {
        ContentItem {
            id,
            page_id: 10,
            container_id: 100,
            column: 0,
            language: 2,
            sort_order: 0,
            version_state: VersionState::Live,
            translation_parent,
            moved_record: 0,
            content_type: "text".to_string(),
            list_type: String::new(),
            grid_layout: String::new(),
            hidden: false,
            reference_page: 0,
        }
    }

    #[test]
    fn default_and_all_languages_never_block() {
        let sink = RecordingSink::default();
        let mut guard = LanguageGuard::new();
        let mixed = vec![item(1, 0), item(2, 1)];
        assert!(!guard.creation_blocked(&mixed, LANGUAGE_DEFAULT, false, &sink));
        assert!(!guard.creation_blocked(&mixed, LANGUAGE_ALL, false, &sink));
        assert!(sink.emitted.borrow().is_empty());
    }

    #[test]
    fn override_skips_inspection() {
        let sink = RecordingSink::default();
        let mut guard = LanguageGuard::new();
        assert!(!guard.creation_blocked(&[item(1, 0), item(2, 1)], 2, true, &sink));
        assert!(sink.emitted.borrow().is_empty());
    }

    #[test]
    fn translations_block_standalone_does_not() {
        let sink = RecordingSink::default();
        let mut guard = LanguageGuard::new();
        assert!(!guard.creation_blocked(&[item(1, 0)], 2, false, &sink));

        let mut guard = LanguageGuard::new();
        assert!(guard.creation_blocked(&[item(2, 1)], 2, false, &sink));
        // translated-only content blocks without warning
        assert!(sink.emitted.borrow().is_empty());
    }

    #[test]
    fn mixed_content_warns_once_per_language() {
        let sink = RecordingSink::default();
        let mut guard = LanguageGuard::new();
        let mixed = vec![item(1, 0), item(2, 1)];
        for _ in 0..4 {
            assert!(guard.creation_blocked(&mixed, 2, false, &sink));
        }
        assert_eq!(
            *sink.emitted.borrow(),
            vec![(WarningKind::MixedTranslations, 2)]
        );
    }

    #[test]
    fn first_call_pins_the_classification() {
        let sink = RecordingSink::default();
        let mut guard = LanguageGuard::new();
        assert!(!guard.creation_blocked(&[item(1, 0)], 2, false, &sink));
        // later calls with translated content do not reopen the decision
        assert!(!guard.creation_blocked(&[item(2, 1)], 2, false, &sink));
        assert!(sink.emitted.borrow().is_empty());
    }

    #[test]
    fn languages_are_tracked_independently() {
        let sink = RecordingSink::default();
        let mut guard = LanguageGuard::new();
        assert!(guard.creation_blocked(&[item(1, 0), item(2, 1)], 2, false, &sink));
        assert!(!guard.creation_blocked(&[item(3, 0)], 3, false, &sink));
        assert_eq!(sink.emitted.borrow().len(), 1);
    }
}
