//! Counters describing what a resolution pass did.

use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

#[derive(Debug, Default, Clone)]
pub struct ResolveMetrics {
    containers: u64,
    items_assigned: u64,
    items_dropped: u64,
    shortcuts: u64,
    schema_cache_hits: u64,
    schema_cache_misses: u64,
}

impl ResolveMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_container(&mut self, assigned: usize, dropped: usize) {
        self.containers = self.containers.saturating_add(1);
        self.items_assigned = self.items_assigned.saturating_add(assigned as u64);
        self.items_dropped = self.items_dropped.saturating_add(dropped as u64);
    }

    pub fn record_shortcut(&mut self, resolved: usize) {
        self.shortcuts = self.shortcuts.saturating_add(1);
        self.items_assigned = self.items_assigned.saturating_add(resolved as u64);
    }

    pub fn record_schema_lookup(&mut self, cache_hit: bool) {
        if cache_hit {
            self.schema_cache_hits = self.schema_cache_hits.saturating_add(1);
        } else {
            self.schema_cache_misses = self.schema_cache_misses.saturating_add(1);
        }
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            containers: self.containers,
            items_assigned: self.items_assigned,
            items_dropped: self.items_dropped,
            shortcuts: self.shortcuts,
            schema_cache_hits: self.schema_cache_hits,
            schema_cache_misses: self.schema_cache_misses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub containers: u64,
    pub items_assigned: u64,
    pub items_dropped: u64,
    pub shortcuts: u64,
    pub schema_cache_hits: u64,
    pub schema_cache_misses: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("containers".to_string(), json!(self.containers));
        map.insert("items_assigned".to_string(), json!(self.items_assigned));
        map.insert("items_dropped".to_string(), json!(self.items_dropped));
        map.insert("shortcuts".to_string(), json!(self.shortcuts));
        map.insert("schema_cache_hits".to_string(), json!(self.schema_cache_hits));
        map.insert(
            "schema_cache_misses".to_string(),
            json!(self.schema_cache_misses),
        );
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "resolve_metrics".to_string(),
            self.as_fields(),
        )
    }
}
