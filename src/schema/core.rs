use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{COLUMN_IN_CONTAINER, COLUMN_UNASSIGNED, ColumnKey};
use crate::permit::{DimensionRules, EffectiveCell, RuleSet};

/// Identifier of a stored layout definition.
pub type LayoutId = String;

/// Display label used for cells without an assigned column position.
pub const UNASSIGNED_LABEL: &str = "unassigned";

/// Validation failures raised while resolving a layout definition.
///
/// Malformed definitions are reported, never silently coerced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("layout `{0}` declares rows but no row count")]
    MissingRowCount(LayoutId),
    #[error("layout `{0}` declares rows but no column count")]
    MissingColCount(LayoutId),
    #[error("layout `{layout}` row {row} column {column}: negative span {span}")]
    NegativeSpan {
        layout: LayoutId,
        row: usize,
        column: usize,
        span: i32,
    },
    #[error("layout `{layout}` row {row} column {column}: negative max item count {max_items}")]
    NegativeMaxItems {
        layout: LayoutId,
        row: usize,
        column: usize,
        max_items: i64,
    },
    #[error("layout `{layout}` assigns column position {column} twice")]
    DuplicateColumn { layout: LayoutId, column: ColumnKey },
}

/// Allow or disallow rule strings of one cell, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStrings {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub list_type: String,
    #[serde(default)]
    pub grid_layout: String,
}

impl RuleStrings {
    fn to_rules(&self) -> DimensionRules {
        DimensionRules::from_strings(&self.content_type, &self.list_type, &self.grid_layout)
    }
}

/// One declared cell of the definition tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    #[serde(default)]
    pub name: String,
    /// Absent means the cell is rendered but takes no assignable content.
    #[serde(default)]
    pub col_pos: Option<ColumnKey>,
    #[serde(default)]
    pub colspan: Option<i32>,
    #[serde(default)]
    pub rowspan: Option<i32>,
    #[serde(default)]
    pub max_items: i64,
    #[serde(default)]
    pub allowed: RuleStrings,
    #[serde(default)]
    pub disallowed: RuleStrings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowDefinition {
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

/// Persisted declarative grid definition, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    #[serde(default)]
    pub row_count: u16,
    #[serde(default)]
    pub col_count: u16,
    #[serde(default)]
    pub rows: Vec<RowDefinition>,
}

/// One resolved grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub column: ColumnKey,
    pub name: String,
    pub col_span: u16,
    pub row_span: u16,
    /// `0` means unlimited.
    pub max_items: u32,
    pub effective: EffectiveCell,
}

impl GridCell {
    pub fn is_assigned(&self) -> bool {
        self.column != COLUMN_UNASSIGNED
    }
}

/// Immutable grid of resolved cells addressed by `(row, column)`.
///
/// Built once per distinct layout identifier; safe to share across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSchema {
    id: LayoutId,
    row_count: u16,
    col_count: u16,
    rows: Vec<Vec<GridCell>>,
    /// Declared column key -> (row index, cell index).
    columns: BTreeMap<ColumnKey, (usize, usize)>,
    single_column: bool,
}

impl LayoutSchema {
    /// Resolve a definition tree into a validated schema.
    ///
    /// A definition without any rows degenerates into single-column
    /// fallback mode. Rows beyond the declared row count are ignored, the
    /// way the persisted format has always been read.
    pub fn resolve(id: impl Into<LayoutId>, definition: &LayoutDefinition) -> Result<Self, SchemaError> {
        let id = id.into();
        if definition.rows.is_empty() {
            return Ok(Self::single_column(id));
        }
        if definition.row_count == 0 {
            return Err(SchemaError::MissingRowCount(id));
        }
        if definition.col_count == 0 {
            return Err(SchemaError::MissingColCount(id));
        }

        let mut rows = Vec::new();
        let mut columns = BTreeMap::new();
        for (row_index, row) in definition
            .rows
            .iter()
            .take(definition.row_count as usize)
            .enumerate()
        {
            let mut cells = Vec::new();
            for (cell_index, column) in row.columns.iter().enumerate() {
                let cell = resolve_cell(&id, row_index, cell_index, column)?;
                if cell.is_assigned() {
                    if columns.contains_key(&cell.column) {
                        return Err(SchemaError::DuplicateColumn {
                            layout: id,
                            column: cell.column,
                        });
                    }
                    columns.insert(cell.column, (rows.len(), cells.len()));
                } else {
                    // repeated unassigned cells collapse onto one logical column
                    columns
                        .entry(COLUMN_UNASSIGNED)
                        .or_insert((rows.len(), cells.len()));
                }
                cells.push(cell);
            }
            rows.push(cells);
        }

        Ok(Self {
            id,
            row_count: definition.row_count,
            col_count: definition.col_count,
            rows,
            columns,
            single_column: false,
        })
    }

    /// Degenerate schema used when a container has no layout definition:
    /// one pseudo-column that takes everything in range.
    pub fn single_column(id: impl Into<LayoutId>) -> Self {
        let cell = GridCell {
            column: 0,
            name: String::new(),
            col_span: 1,
            row_span: 1,
            max_items: 0,
            effective: EffectiveCell::unrestricted(),
        };
        let mut columns = BTreeMap::new();
        columns.insert(0, (0, 0));
        Self {
            id: id.into(),
            row_count: 1,
            col_count: 1,
            rows: vec![vec![cell]],
            columns,
            single_column: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn row_count(&self) -> u16 {
        self.row_count
    }

    pub fn col_count(&self) -> u16 {
        self.col_count
    }

    pub fn is_single_column(&self) -> bool {
        self.single_column
    }

    /// Rows of cells in declaration order, spanned cells included.
    pub fn rows(&self) -> &[Vec<GridCell>] {
        &self.rows
    }

    /// One cell per distinct column key, in key order.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.columns
            .values()
            .map(|(row, cell)| &self.rows[*row][*cell])
    }

    pub fn cell(&self, column: ColumnKey) -> Option<&GridCell> {
        self.columns
            .get(&column)
            .map(|(row, cell)| &self.rows[*row][*cell])
    }

    /// Column keys candidate content may be assigned to, including the
    /// unassigned slot when the layout declares one.
    pub fn declared_columns(&self) -> Vec<ColumnKey> {
        if self.single_column {
            return vec![COLUMN_IN_CONTAINER];
        }
        self.columns.keys().copied().collect()
    }
}

fn resolve_cell(
    layout: &LayoutId,
    row: usize,
    column: usize,
    definition: &ColumnDefinition,
) -> Result<GridCell, SchemaError> {
    let col_span = resolve_span(layout, row, column, definition.colspan)?;
    let row_span = resolve_span(layout, row, column, definition.rowspan)?;
    if definition.max_items < 0 {
        return Err(SchemaError::NegativeMaxItems {
            layout: layout.clone(),
            row,
            column,
            max_items: definition.max_items,
        });
    }

    Ok(match definition.col_pos {
        Some(key) => GridCell {
            column: key,
            name: definition.name.clone(),
            col_span,
            row_span,
            max_items: definition.max_items as u32,
            effective: EffectiveCell::compute(
                &definition.allowed.to_rules(),
                &definition.disallowed.to_rules(),
            ),
        },
        None => GridCell {
            column: COLUMN_UNASSIGNED,
            name: if definition.name.is_empty() {
                UNASSIGNED_LABEL.to_string()
            } else {
                format!("{} ({})", definition.name, UNASSIGNED_LABEL)
            },
            col_span,
            row_span,
            max_items: 0,
            effective: EffectiveCell::compute(
                &DimensionRules {
                    content_type: RuleSet::empty(),
                    list_type: RuleSet::empty(),
                    grid_layout: RuleSet::empty(),
                },
                &DimensionRules {
                    content_type: RuleSet::Wildcard,
                    list_type: RuleSet::Wildcard,
                    grid_layout: RuleSet::Wildcard,
                },
            ),
        },
    })
}

fn resolve_span(
    layout: &LayoutId,
    row: usize,
    column: usize,
    span: Option<i32>,
) -> Result<u16, SchemaError> {
    match span {
        None => Ok(1),
        Some(span) if span < 0 => Err(SchemaError::NegativeSpan {
            layout: layout.clone(),
            row,
            column,
            span,
        }),
        Some(0) => Ok(1),
        Some(span) => Ok(span as u16),
    }
}
