use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Generic content type marking embedded list plugins.
pub const CONTENT_TYPE_LIST: &str = "list";

/// Generic content type marking nested grid containers.
pub const CONTENT_TYPE_GRID: &str = "grid";

/// One allow or disallow rule: either the wildcard or an explicit value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    Wildcard,
    Values(BTreeSet<String>),
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::Values(BTreeSet::new())
    }
}

impl RuleSet {
    /// Parse a persisted rule string: `"*"` is the wildcard, an empty string
    /// is the empty set, anything else a comma-separated value list.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == "*" {
            return RuleSet::Wildcard;
        }
        let values: BTreeSet<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        RuleSet::Values(values)
    }

    pub fn empty() -> Self {
        RuleSet::Values(BTreeSet::new())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, RuleSet::Wildcard)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RuleSet::Wildcard => false,
            RuleSet::Values(values) => values.is_empty(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            RuleSet::Wildcard => true,
            RuleSet::Values(values) => values.contains(value),
        }
    }

    fn insert(&mut self, value: &str) {
        if let RuleSet::Values(values) = self {
            values.insert(value.to_string());
        }
    }

    fn remove(&mut self, value: &str) {
        if let RuleSet::Values(values) = self {
            values.remove(value);
        }
    }
}

/// Raw rules of one side (allow or disallow) across the three dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionRules {
    pub content_type: RuleSet,
    pub list_type: RuleSet,
    pub grid_layout: RuleSet,
}

impl DimensionRules {
    pub fn from_strings(content_type: &str, list_type: &str, grid_layout: &str) -> Self {
        Self {
            content_type: RuleSet::parse(content_type),
            list_type: RuleSet::parse(list_type),
            grid_layout: RuleSet::parse(grid_layout),
        }
    }

    /// Rule pair half that permits everything.
    pub fn everything() -> Self {
        Self {
            content_type: RuleSet::Wildcard,
            list_type: RuleSet::Wildcard,
            grid_layout: RuleSet::Wildcard,
        }
    }

    /// Rule pair half that names nothing.
    pub fn nothing() -> Self {
        Self::default()
    }
}

/// Effective allow/disallow pair for a single dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveSet {
    pub allowed: RuleSet,
    pub disallowed: RuleSet,
}

impl EffectiveSet {
    /// A disallow wildcard empties the allowed side without even looking at
    /// the allow rule. Otherwise a value named on both sides cancels out of
    /// both; neither side wins.
    fn compute(allow: &RuleSet, disallow: &RuleSet) -> Self {
        if disallow.is_wildcard() {
            return Self {
                allowed: RuleSet::empty(),
                disallowed: RuleSet::Wildcard,
            };
        }
        let mut allowed = allow.clone();
        let mut disallowed = disallow.clone();
        if let (RuleSet::Values(allow_values), RuleSet::Values(disallow_values)) =
            (allow, disallow)
        {
            for value in allow_values.intersection(disallow_values) {
                allowed.remove(value);
                disallowed.remove(value);
            }
        }
        Self {
            allowed,
            disallowed,
        }
    }

    pub fn denies_everything(&self) -> bool {
        self.disallowed.is_wildcard()
    }

    pub fn permits(&self, value: &str) -> bool {
        !self.disallowed.contains(value) && self.allowed.contains(value)
    }
}

/// Effective permission sets of one grid cell across all three dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveCell {
    pub content_type: EffectiveSet,
    pub list_type: EffectiveSet,
    pub grid_layout: EffectiveSet,
}

impl EffectiveCell {
    /// Compute the effective sets for a cell's rule pair.
    ///
    /// The evaluation order is part of the contract: each dimension is
    /// reduced on its own first, then the list dimension couples into the
    /// content-type allowed set, then the grid dimension does. A fully
    /// disallowed list/grid dimension strips its generic marker from the
    /// content-type allowed set; a dimension with explicit allowed values
    /// re-adds the marker, but only while the content-type allowed set is
    /// non-empty.
    pub fn compute(allowed: &DimensionRules, disallowed: &DimensionRules) -> Self {
        let mut content_type = EffectiveSet::compute(&allowed.content_type, &disallowed.content_type);
        let list_type = EffectiveSet::compute(&allowed.list_type, &disallowed.list_type);
        let grid_layout = EffectiveSet::compute(&allowed.grid_layout, &disallowed.grid_layout);

        Self::couple(&mut content_type, &list_type, CONTENT_TYPE_LIST);
        Self::couple(&mut content_type, &grid_layout, CONTENT_TYPE_GRID);

        Self {
            content_type,
            list_type,
            grid_layout,
        }
    }

    fn couple(content_type: &mut EffectiveSet, dimension: &EffectiveSet, marker: &str) {
        if dimension.denies_everything() {
            content_type.allowed.remove(marker);
        } else if !dimension.allowed.is_wildcard()
            && !dimension.allowed.is_empty()
            && !content_type.allowed.is_empty()
        {
            content_type.allowed.insert(marker);
        }
    }

    /// Cell that places no restrictions at all.
    pub fn unrestricted() -> Self {
        Self::compute(&DimensionRules::everything(), &DimensionRules::nothing())
    }

    pub fn denies_everything(&self) -> bool {
        self.content_type.denies_everything()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(names: &[&str]) -> RuleSet {
        RuleSet::Values(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn parse_rule_strings() {
        assert_eq!(RuleSet::parse("*"), RuleSet::Wildcard);
        assert_eq!(RuleSet::parse(""), RuleSet::empty());
        assert_eq!(RuleSet::parse("text, image ,text"), values(&["text", "image"]));
    }

    #[test]
    fn disallow_wildcard_empties_allowed_side() {
        let effective = EffectiveSet::compute(&values(&["text", "image"]), &RuleSet::Wildcard);
        assert!(effective.allowed.is_empty());
        assert!(effective.disallowed.is_wildcard());
        assert!(!effective.permits("text"));
    }

    #[test]
    fn shared_values_cancel_on_both_sides() {
        let effective = EffectiveSet::compute(
            &values(&["text", "image", "quote"]),
            &values(&["image", "video"]),
        );
        assert_eq!(effective.allowed, values(&["text", "quote"]));
        assert_eq!(effective.disallowed, values(&["video"]));
        assert!(!effective.permits("image"));
    }

    #[test]
    fn cancellation_is_idempotent() {
        let first = EffectiveSet::compute(&values(&["text", "image"]), &values(&["image"]));
        let second = EffectiveSet::compute(&first.allowed, &first.disallowed);
        assert_eq!(first, second);
    }

    #[test]
    fn effective_cell_is_idempotent() {
        let allowed = DimensionRules::from_strings("text,list", "news,search", "two_col");
        let disallowed = DimensionRules::from_strings("list", "search", "");
        let first = EffectiveCell::compute(&allowed, &disallowed);
        let again = EffectiveCell::compute(
            &DimensionRules {
                content_type: first.content_type.allowed.clone(),
                list_type: first.list_type.allowed.clone(),
                grid_layout: first.grid_layout.allowed.clone(),
            },
            &DimensionRules {
                content_type: first.content_type.disallowed.clone(),
                list_type: first.list_type.disallowed.clone(),
                grid_layout: first.grid_layout.disallowed.clone(),
            },
        );
        assert_eq!(first, again);
    }

    #[test]
    fn list_wildcard_disallow_strips_generic_list_type() {
        let allowed = DimensionRules::from_strings("text,list", "", "");
        let disallowed = DimensionRules::from_strings("", "*", "");
        let cell = EffectiveCell::compute(&allowed, &disallowed);
        assert_eq!(cell.content_type.allowed, values(&["text"]));
        assert!(cell.list_type.denies_everything());
    }

    #[test]
    fn grid_wildcard_disallow_strips_generic_grid_type() {
        let allowed = DimensionRules::from_strings("text,grid", "", "");
        let disallowed = DimensionRules::from_strings("", "", "*");
        let cell = EffectiveCell::compute(&allowed, &disallowed);
        assert_eq!(cell.content_type.allowed, values(&["text"]));
    }

    #[test]
    fn generic_markers_added_only_when_content_types_present() {
        // explicit list types re-add the marker...
        let cell = EffectiveCell::compute(
            &DimensionRules::from_strings("text", "news", ""),
            &DimensionRules::nothing(),
        );
        assert_eq!(cell.content_type.allowed, values(&["text", "list"]));

        // ...but not into an empty content-type allowed set
        let cell = EffectiveCell::compute(
            &DimensionRules::from_strings("", "news", ""),
            &DimensionRules::nothing(),
        );
        assert!(cell.content_type.allowed.is_empty());
    }

    #[test]
    fn wildcard_disallow_beats_generic_readd() {
        // the list dimension is processed before the grid dimension; a grid
        // wildcard disallow must still strip a marker the list coupling
        // would have counted as "content types present"
        let allowed = DimensionRules::from_strings("grid", "news", "");
        let disallowed = DimensionRules::from_strings("", "", "*");
        let cell = EffectiveCell::compute(&allowed, &disallowed);
        assert_eq!(cell.content_type.allowed, values(&["list"]));
        assert!(!cell.content_type.allowed.contains(CONTENT_TYPE_GRID));
    }

    #[test]
    fn unrestricted_cell_permits_everything() {
        let cell = EffectiveCell::unrestricted();
        assert!(cell.content_type.permits("anything"));
        assert!(cell.list_type.permits("any_list"));
        assert!(!cell.denies_everything());
    }
}
