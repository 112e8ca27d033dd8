use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use blake3::Hash;

use super::core::{LayoutDefinition, LayoutId, LayoutSchema, SchemaError};

struct CacheEntry {
    fingerprint: Hash,
    schema: Arc<LayoutSchema>,
}

/// Process-wide cache of resolved layout schemas, keyed by layout id.
///
/// Entries carry a fingerprint of the definition they were resolved from,
/// so a changed definition behind an unchanged identifier re-resolves
/// instead of serving a stale schema. Writes are idempotent for the same
/// key and fingerprint; redundant recomputation under concurrent misses is
/// harmless, last write wins.
#[derive(Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<LayoutId, CacheEntry>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(definition: &LayoutDefinition) -> Hash {
        let bytes = serde_json::to_vec(definition).expect("layout definition serializes");
        blake3::hash(&bytes)
    }

    /// Cached schema for this id, provided the definition has not changed.
    pub fn cached(&self, id: &str, fingerprint: &Hash) -> Option<Arc<LayoutSchema>> {
        let entries = self.entries.read().expect("schema cache lock poisoned");
        entries
            .get(id)
            .filter(|entry| entry.fingerprint == *fingerprint)
            .map(|entry| Arc::clone(&entry.schema))
    }

    pub fn store(&self, fingerprint: Hash, schema: Arc<LayoutSchema>) {
        let mut entries = self.entries.write().expect("schema cache lock poisoned");
        entries.insert(
            schema.id().to_string(),
            CacheEntry {
                fingerprint,
                schema,
            },
        );
    }

    /// Resolve through the cache. Returns the schema plus whether the
    /// lookup was served from cache.
    pub fn resolve(
        &self,
        id: &str,
        definition: &LayoutDefinition,
    ) -> Result<(Arc<LayoutSchema>, bool), SchemaError> {
        let fingerprint = Self::fingerprint(definition);
        if let Some(schema) = self.cached(id, &fingerprint) {
            return Ok((schema, true));
        }
        let schema = Arc::new(LayoutSchema::resolve(id, definition)?);
        self.store(fingerprint, Arc::clone(&schema));
        Ok((schema, false))
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("schema cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, RowDefinition};

    fn definition(max_items: i64) -> LayoutDefinition {
        LayoutDefinition {
            row_count: 1,
            col_count: 1,
            rows: vec![RowDefinition {
                columns: vec![ColumnDefinition {
                    col_pos: Some(0),
                    max_items,
                    ..ColumnDefinition::default()
                }],
            }],
        }
    }

    #[test]
    fn second_resolve_is_a_cache_hit() {
        let cache = SchemaCache::new();
        let (first, hit) = cache.resolve("layout", &definition(0)).unwrap();
        assert!(!hit);
        let (second, hit) = cache.resolve("layout", &definition(0)).unwrap();
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_definition_invalidates_entry() {
        let cache = SchemaCache::new();
        cache.resolve("layout", &definition(0)).unwrap();
        let (schema, hit) = cache.resolve("layout", &definition(5)).unwrap();
        assert!(!hit);
        assert_eq!(schema.cell(0).unwrap().max_items, 5);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalid_definition_is_not_cached() {
        let cache = SchemaCache::new();
        let mut broken = definition(0);
        broken.row_count = 0;
        assert!(cache.resolve("layout", &broken).is_err());
        assert!(cache.is_empty());
    }
}
