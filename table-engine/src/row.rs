//! FILENAME: table-engine/src/row.rs
//! PURPOSE: Rows, row models and the row handle.
//! CONTEXT: A `RowModel` is the immutable output of exactly one pipeline stage.
//! Rows are shared between stages through `Rc`; a stage that reorders or prunes
//! sub-rows produces a new `Row` with the same identity fields rather than
//! mutating the old one.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::CellRef;
use crate::column::{Column, RowData};
use crate::error::TableError;
use crate::state::{ColumnId, RowId};
use crate::table::Table;
use crate::value::TableValue;

/// One row of the table. `original` is the owned raw source value; synthetic
/// group rows have none and resolve their values from `grouping_value` and
/// `aggregates` instead. The parent link is a non-owning id handle; the
/// producing `RowModel` is the sole owner of row lifetime.
pub struct Row<T> {
    pub id: RowId,
    /// Position within the immediate parent collection.
    pub index: usize,
    pub depth: usize,
    pub parent_id: Option<RowId>,
    pub original: Option<Rc<T>>,
    pub sub_rows: Vec<Rc<Row<T>>>,

    /// Set on synthetic rows produced by the grouped stage.
    pub grouping_column: Option<ColumnId>,
    pub grouping_value: Option<TableValue>,
    pub aggregates: FxHashMap<ColumnId, TableValue>,

    value_cache: RefCell<FxHashMap<ColumnId, TableValue>>,
}

impl<T> Row<T> {
    pub fn new(
        id: RowId,
        index: usize,
        depth: usize,
        parent_id: Option<RowId>,
        original: Rc<T>,
    ) -> Self {
        Row {
            id,
            index,
            depth,
            parent_id,
            original: Some(original),
            sub_rows: Vec::new(),
            grouping_column: None,
            grouping_value: None,
            aggregates: FxHashMap::default(),
            value_cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub(crate) fn grouped(
        id: RowId,
        index: usize,
        depth: usize,
        parent_id: Option<RowId>,
        grouping_column: ColumnId,
        grouping_value: TableValue,
        aggregates: FxHashMap<ColumnId, TableValue>,
        sub_rows: Vec<Rc<Row<T>>>,
    ) -> Self {
        Row {
            id,
            index,
            depth,
            parent_id,
            original: None,
            sub_rows,
            grouping_column: Some(grouping_column),
            grouping_value: Some(grouping_value),
            aggregates,
            value_cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Same identity, different sub-rows. Used by stages that filter or
    /// reorder children without changing which row this is.
    pub(crate) fn with_sub_rows(&self, sub_rows: Vec<Rc<Row<T>>>) -> Row<T> {
        Row {
            id: self.id.clone(),
            index: self.index,
            depth: self.depth,
            parent_id: self.parent_id.clone(),
            original: self.original.clone(),
            sub_rows,
            grouping_column: self.grouping_column.clone(),
            grouping_value: self.grouping_value.clone(),
            aggregates: self.aggregates.clone(),
            value_cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.grouping_column.is_some()
    }

    /// Resolves this row's value for a column, caching per column id.
    pub fn value(&self, column: &Column<T>) -> TableValue {
        if let Some(cached) = self.value_cache.borrow().get(&column.id) {
            return cached.clone();
        }
        let value = match &self.original {
            Some(original) => column.resolve_value(original),
            None => {
                if self.grouping_column.as_deref() == Some(column.id.as_str()) {
                    self.grouping_value.clone().unwrap_or(TableValue::Null)
                } else {
                    self.aggregates
                        .get(&column.id)
                        .cloned()
                        .unwrap_or(TableValue::Null)
                }
            }
        };
        self.value_cache
            .borrow_mut()
            .insert(column.id.clone(), value.clone());
        value
    }

    /// Leaf descendants carrying source data (self when it has an original
    /// and no sub-rows).
    pub fn leaf_rows(self: &Rc<Self>) -> Vec<Rc<Row<T>>> {
        let mut leaves = Vec::new();
        collect_leaf_rows(self, &mut leaves);
        leaves
    }
}

fn collect_leaf_rows<T>(row: &Rc<Row<T>>, out: &mut Vec<Rc<Row<T>>>) {
    if row.sub_rows.is_empty() {
        if row.original.is_some() {
            out.push(row.clone());
        }
    } else {
        for sub in &row.sub_rows {
            collect_leaf_rows(sub, out);
        }
    }
}

// ============================================================================
// ROW MODEL
// ============================================================================

/// The immutable output of one derivation stage: ordered top-level rows, the
/// depth-first flattening including sub-rows, and an id lookup. A new model
/// replaces, never mutates, the old one.
pub struct RowModel<T> {
    pub rows: Vec<Rc<Row<T>>>,
    pub flat_rows: Vec<Rc<Row<T>>>,
    pub rows_by_id: FxHashMap<RowId, Rc<Row<T>>>,
}

impl<T> RowModel<T> {
    pub fn empty() -> Self {
        RowModel {
            rows: Vec::new(),
            flat_rows: Vec::new(),
            rows_by_id: FxHashMap::default(),
        }
    }

    /// Builds a model from top-level rows. Rows already seen during the
    /// depth-first walk are skipped, so a list that inlines expanded sub-rows
    /// next to their parent flattens without duplicates.
    pub fn from_rows(rows: Vec<Rc<Row<T>>>) -> Self {
        let mut flat_rows = Vec::new();
        let mut rows_by_id = FxHashMap::default();
        let mut seen: FxHashSet<RowId> = FxHashSet::default();
        for row in &rows {
            flatten_into(row, &mut flat_rows, &mut rows_by_id, &mut seen);
        }
        RowModel {
            rows,
            flat_rows,
            rows_by_id,
        }
    }

    /// Like `from_rows` but rejects duplicate row ids. Used by the core stage,
    /// where a colliding host-supplied row id is a configuration error.
    pub fn from_rows_checked(rows: Vec<Rc<Row<T>>>) -> Result<Self, TableError> {
        let mut seen: FxHashSet<RowId> = FxHashSet::default();
        for row in &rows {
            if let Some(dup) = find_duplicate(row, &mut seen) {
                return Err(TableError::DuplicateRowId(dup));
            }
        }
        Ok(RowModel::from_rows(rows))
    }

    pub fn row(&self, id: &str) -> Option<&Rc<Row<T>>> {
        self.rows_by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn flatten_into<T>(
    row: &Rc<Row<T>>,
    flat: &mut Vec<Rc<Row<T>>>,
    by_id: &mut FxHashMap<RowId, Rc<Row<T>>>,
    seen: &mut FxHashSet<RowId>,
) {
    if !seen.insert(row.id.clone()) {
        return;
    }
    flat.push(row.clone());
    by_id.insert(row.id.clone(), row.clone());
    for sub in &row.sub_rows {
        flatten_into(sub, flat, by_id, seen);
    }
}

fn find_duplicate<T>(row: &Rc<Row<T>>, seen: &mut FxHashSet<RowId>) -> Option<RowId> {
    if !seen.insert(row.id.clone()) {
        return Some(row.id.clone());
    }
    for sub in &row.sub_rows {
        if let Some(dup) = find_duplicate(sub, seen) {
            return Some(dup);
        }
    }
    None
}

// ============================================================================
// ROW HANDLE
// ============================================================================

/// A row paired with its table for operation dispatch.
pub struct RowRef<'t, T> {
    pub(crate) table: &'t Table<T>,
    pub(crate) row: Rc<Row<T>>,
}

impl<'t, T: RowData> RowRef<'t, T> {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn row(&self) -> &Rc<Row<T>> {
        &self.row
    }

    pub fn value(&self, column_id: &str) -> Result<TableValue, TableError> {
        let column = self
            .table
            .column_by_id(column_id)
            .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))?;
        Ok(self.row.value(&column))
    }

    /// One cell per leaf column, regardless of visibility.
    pub fn all_cells(&self) -> Vec<CellRef<'t, T>> {
        self.table
            .leaf_columns()
            .iter()
            .map(|column| CellRef {
                table: self.table,
                row: self.row.clone(),
                column: column.clone(),
            })
            .collect()
    }

    pub fn visible_cells(&self) -> Result<Vec<CellRef<'t, T>>, TableError> {
        let op = self
            .table
            .ops()
            .row
            .visible_cells
            .as_ref()
            .ok_or(TableError::MissingOperation("row.visible_cells"))?;
        Ok(op(self.table, &self.row))
    }

    pub fn left_visible_cells(&self) -> Result<Vec<CellRef<'t, T>>, TableError> {
        let op = self
            .table
            .ops()
            .row
            .left_visible_cells
            .as_ref()
            .ok_or(TableError::MissingOperation("row.left_visible_cells"))?;
        Ok(op(self.table, &self.row))
    }

    pub fn center_visible_cells(&self) -> Result<Vec<CellRef<'t, T>>, TableError> {
        let op = self
            .table
            .ops()
            .row
            .center_visible_cells
            .as_ref()
            .ok_or(TableError::MissingOperation("row.center_visible_cells"))?;
        Ok(op(self.table, &self.row))
    }

    pub fn right_visible_cells(&self) -> Result<Vec<CellRef<'t, T>>, TableError> {
        let op = self
            .table
            .ops()
            .row
            .right_visible_cells
            .as_ref()
            .ok_or(TableError::MissingOperation("row.right_visible_cells"))?;
        Ok(op(self.table, &self.row))
    }

    pub fn toggle_expanded(&self, expanded: Option<bool>) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .row
            .toggle_expanded
            .as_ref()
            .ok_or(TableError::MissingOperation("row.toggle_expanded"))?;
        op(self.table, &self.row, expanded)
    }

    pub fn is_expanded(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .row
            .is_expanded
            .as_ref()
            .ok_or(TableError::MissingOperation("row.is_expanded"))?;
        Ok(op(self.table, &self.row))
    }

    pub fn can_expand(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .row
            .can_expand
            .as_ref()
            .ok_or(TableError::MissingOperation("row.can_expand"))?;
        Ok(op(self.table, &self.row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;
    use crate::column::build_columns;

    #[derive(Clone)]
    struct Rec {
        n: i64,
    }

    fn leaf(id: &str, n: i64) -> Rc<Row<Rec>> {
        Rc::new(Row::new(
            id.to_string(),
            0,
            0,
            None,
            Rc::new(Rec { n }),
        ))
    }

    #[test]
    fn test_from_rows_flattens_sub_rows() {
        let child = leaf("0.0", 2);
        let mut parent = Row::new("0".to_string(), 0, 0, None, Rc::new(Rec { n: 1 }));
        parent.sub_rows = vec![child];
        let model = RowModel::from_rows(vec![Rc::new(parent)]);
        assert_eq!(model.rows.len(), 1);
        assert_eq!(model.flat_rows.len(), 2);
        assert!(model.row("0.0").is_some());
    }

    #[test]
    fn test_from_rows_skips_rows_already_seen() {
        // Expanded layout: a sub-row inlined after its parent at top level
        let child = leaf("0.0", 2);
        let mut parent = Row::new("0".to_string(), 0, 0, None, Rc::new(Rec { n: 1 }));
        parent.sub_rows = vec![child.clone()];
        let model = RowModel::from_rows(vec![Rc::new(parent), child]);
        assert_eq!(model.rows.len(), 2);
        assert_eq!(model.flat_rows.len(), 2);
    }

    #[test]
    fn test_checked_build_rejects_duplicate_ids() {
        let model = RowModel::from_rows_checked(vec![leaf("a", 1), leaf("a", 2)]);
        assert_eq!(
            model.err(),
            Some(TableError::DuplicateRowId("a".to_string()))
        );
    }

    #[test]
    fn test_value_resolution_and_cache() {
        let set = build_columns(&[ColumnDef::<Rec>::new("n", |r| TableValue::Int(r.n))]).unwrap();
        let row = leaf("0", 7);
        assert_eq!(row.value(&set.leaves[0]), TableValue::Int(7));
        // Second read comes from the per-row cache
        assert_eq!(row.value(&set.leaves[0]), TableValue::Int(7));
    }

    #[test]
    fn test_grouped_row_resolves_group_value_and_aggregates() {
        let set = build_columns(&[
            ColumnDef::<Rec>::new("n", |r| TableValue::Int(r.n)),
            ColumnDef::<Rec>::new("m", |r| TableValue::Int(r.n * 2)),
        ])
        .unwrap();
        let mut aggregates = FxHashMap::default();
        aggregates.insert("m".to_string(), TableValue::Int(42));
        let row: Rc<Row<Rec>> = Rc::new(Row::grouped(
            "n:7".to_string(),
            0,
            0,
            None,
            "n".to_string(),
            TableValue::Int(7),
            aggregates,
            vec![],
        ));
        assert_eq!(row.value(&set.by_id["n"]), TableValue::Int(7));
        assert_eq!(row.value(&set.by_id["m"]), TableValue::Int(42));
    }
}
