//! FILENAME: table-engine/src/column.rs
//! PURPOSE: Column definitions and the resolved column tree.
//! CONTEXT: Hosts describe columns declaratively (`ColumnDef`); construction
//! resolves them once into immutable `Column`s with unique table-wide ids.
//! Columns carry no back-pointer to their table; `ColumnRef` pairs a borrowed
//! table with a column for operation dispatch.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::TableError;
use crate::state::{ColumnId, FilterValue, PinSide, SortDirection};
use crate::table::Table;
use crate::value::TableValue;

/// Marker bounds for raw row data.
pub trait RowData: Clone + 'static {}
impl<T: Clone + 'static> RowData for T {}

/// Resolves a raw row into the value this column presents.
pub type Accessor<T> = Rc<dyn Fn(&T) -> TableValue>;

/// Value-level comparator used by the sorted stage.
pub type SortingFn = Rc<dyn Fn(&TableValue, &TableValue) -> Ordering>;

/// Per-column filter predicate: does `value` satisfy `filter_value`?
pub type FilterFn = Rc<dyn Fn(&TableValue, &FilterValue) -> bool>;

/// Folds the leaf values under a group row into a single aggregate.
pub type AggregationFn = Rc<dyn Fn(&[TableValue]) -> TableValue>;

/// Reference to a named or inline function, resolved at first use.
/// `Auto` picks the built-in default for the value/filter kind at hand.
pub enum FnRef<F> {
    Auto,
    Named(String),
    Custom(F),
}

impl<F> Default for FnRef<F> {
    fn default() -> Self {
        FnRef::Auto
    }
}

impl<F: Clone> Clone for FnRef<F> {
    fn clone(&self) -> Self {
        match self {
            FnRef::Auto => FnRef::Auto,
            FnRef::Named(name) => FnRef::Named(name.clone()),
            FnRef::Custom(f) => FnRef::Custom(f.clone()),
        }
    }
}

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

/// Declarative description of one column. Group columns carry child
/// definitions and usually no accessor; leaf columns carry an accessor.
pub struct ColumnDef<T> {
    /// Explicit id. Falls back to `header`; a definition with neither fails
    /// construction.
    pub id: Option<ColumnId>,
    pub header: Option<String>,
    pub accessor: Option<Accessor<T>>,
    pub columns: Vec<ColumnDef<T>>,

    pub filter_fn: FnRef<FilterFn>,
    pub sorting_fn: FnRef<SortingFn>,
    pub aggregation_fn: FnRef<AggregationFn>,

    pub enable_sorting: bool,
    pub enable_filtering: bool,
    pub enable_global_filter: bool,
    pub enable_grouping: bool,
    pub enable_hiding: bool,
    pub enable_pinning: bool,
    pub enable_resizing: bool,

    /// Base width plus the clamp range resizing respects.
    pub size: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl<T> ColumnDef<T> {
    /// A leaf column with an explicit id and an accessor.
    pub fn new(id: impl Into<String>, accessor: impl Fn(&T) -> TableValue + 'static) -> Self {
        ColumnDef {
            id: Some(id.into()),
            accessor: Some(Rc::new(accessor)),
            ..ColumnDef::empty()
        }
    }

    /// A group column holding child definitions.
    pub fn group(header: impl Into<String>, columns: Vec<ColumnDef<T>>) -> Self {
        ColumnDef {
            header: Some(header.into()),
            columns,
            ..ColumnDef::empty()
        }
    }

    fn empty() -> Self {
        ColumnDef {
            id: None,
            header: None,
            accessor: None,
            columns: Vec::new(),
            filter_fn: FnRef::Auto,
            sorting_fn: FnRef::Auto,
            aggregation_fn: FnRef::Auto,
            enable_sorting: true,
            enable_filtering: true,
            enable_global_filter: true,
            enable_grouping: true,
            enable_hiding: true,
            enable_pinning: true,
            enable_resizing: true,
            size: 150.0,
            min_size: 20.0,
            max_size: f32::MAX,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_sorting_fn(mut self, f: FnRef<SortingFn>) -> Self {
        self.sorting_fn = f;
        self
    }

    pub fn with_filter_fn(mut self, f: FnRef<FilterFn>) -> Self {
        self.filter_fn = f;
        self
    }

    pub fn with_aggregation_fn(mut self, f: FnRef<AggregationFn>) -> Self {
        self.aggregation_fn = f;
        self
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        ColumnDef {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            columns: self.columns.clone(),
            filter_fn: self.filter_fn.clone(),
            sorting_fn: self.sorting_fn.clone(),
            aggregation_fn: self.aggregation_fn.clone(),
            enable_sorting: self.enable_sorting,
            enable_filtering: self.enable_filtering,
            enable_global_filter: self.enable_global_filter,
            enable_grouping: self.enable_grouping,
            enable_hiding: self.enable_hiding,
            enable_pinning: self.enable_pinning,
            enable_resizing: self.enable_resizing,
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

// ============================================================================
// RESOLVED COLUMN
// ============================================================================

/// An immutable resolved column. The child definitions of the originating
/// `ColumnDef` live on as `children`; the embedded def's `columns` is empty.
pub struct Column<T> {
    pub id: ColumnId,
    pub depth: usize,
    pub parent_id: Option<ColumnId>,
    pub children: Vec<Rc<Column<T>>>,
    pub def: ColumnDef<T>,
}

impl<T> Column<T> {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn header(&self) -> &str {
        self.def.header.as_deref().unwrap_or(&self.id)
    }

    /// Resolves this column's value from a raw row. Columns without an
    /// accessor (group columns) resolve to `Null`.
    pub fn resolve_value(&self, original: &T) -> TableValue {
        match &self.def.accessor {
            Some(accessor) => accessor(original),
            None => TableValue::Null,
        }
    }

    /// Leaf columns under this column, in definition order (self when leaf).
    pub fn leaf_columns(self: &Rc<Self>) -> Vec<Rc<Column<T>>> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }

    pub fn leaf_ids(self: &Rc<Self>) -> Vec<ColumnId> {
        self.leaf_columns().iter().map(|c| c.id.clone()).collect()
    }
}

fn collect_leaves<T>(column: &Rc<Column<T>>, out: &mut Vec<Rc<Column<T>>>) {
    if column.is_leaf() {
        out.push(column.clone());
    } else {
        for child in &column.children {
            collect_leaves(child, out);
        }
    }
}

/// The resolved column tree plus its flat projections.
pub(crate) struct ColumnSet<T> {
    pub roots: Vec<Rc<Column<T>>>,
    /// Depth-first, parents before children.
    pub flat: Vec<Rc<Column<T>>>,
    /// Leaves in definition order.
    pub leaves: Vec<Rc<Column<T>>>,
    pub by_id: FxHashMap<ColumnId, Rc<Column<T>>>,
}

pub(crate) fn build_columns<T>(defs: &[ColumnDef<T>]) -> Result<ColumnSet<T>, TableError> {
    let mut set = ColumnSet {
        roots: Vec::new(),
        flat: Vec::new(),
        leaves: Vec::new(),
        by_id: FxHashMap::default(),
    };
    let roots = build_level(defs, 0, None, &mut set)?;
    set.roots = roots;
    Ok(set)
}

fn build_level<T>(
    defs: &[ColumnDef<T>],
    depth: usize,
    parent_id: Option<&ColumnId>,
    set: &mut ColumnSet<T>,
) -> Result<Vec<Rc<Column<T>>>, TableError> {
    let mut level = Vec::with_capacity(defs.len());
    for def in defs {
        let id = match (&def.id, &def.header) {
            (Some(id), _) => id.clone(),
            (None, Some(header)) => header.clone(),
            (None, None) => return Err(TableError::MissingColumnId),
        };
        if set.by_id.contains_key(&id) {
            return Err(TableError::DuplicateColumnId(id));
        }

        let children = build_level(&def.columns, depth + 1, Some(&id), set)?;
        let mut def = def.clone();
        def.columns = Vec::new();
        let column = Rc::new(Column {
            id: id.clone(),
            depth,
            parent_id: parent_id.cloned(),
            children,
            def,
        });

        set.by_id.insert(id, column.clone());
        set.flat.push(column.clone());
        if column.is_leaf() {
            set.leaves.push(column.clone());
        }
        level.push(column);
    }
    Ok(level)
}

// ============================================================================
// COLUMN HANDLE
// ============================================================================

/// A column paired with its table for operation dispatch. Operations attached
/// by features are looked up in the composed slot tables; an unfilled slot is
/// `TableError::MissingOperation`, never a silent no-op.
pub struct ColumnRef<'t, T> {
    pub(crate) table: &'t Table<T>,
    pub(crate) column: Rc<Column<T>>,
}

impl<'t, T: RowData> ColumnRef<'t, T> {
    pub fn id(&self) -> &str {
        &self.column.id
    }

    pub fn column(&self) -> &Rc<Column<T>> {
        &self.column
    }

    // ---- filtering --------------------------------------------------------

    pub fn filter_value(&self) -> Result<Option<FilterValue>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .filter_value
            .as_ref()
            .ok_or(TableError::MissingOperation("column.filter_value"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn set_filter_value(&self, value: FilterValue) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .set_filter_value
            .as_ref()
            .ok_or(TableError::MissingOperation("column.set_filter_value"))?;
        op(self.table, &self.column, value);
        Ok(())
    }

    pub fn can_filter(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .can_filter
            .as_ref()
            .ok_or(TableError::MissingOperation("column.can_filter"))?;
        Ok(op(self.table, &self.column))
    }

    // ---- sorting ----------------------------------------------------------

    /// Cycles ascending -> descending -> unsorted, or forces `direction`.
    /// With `multi` the entry is appended to the existing sort list.
    pub fn toggle_sorting(
        &self,
        direction: Option<SortDirection>,
        multi: bool,
    ) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .toggle_sorting
            .as_ref()
            .ok_or(TableError::MissingOperation("column.toggle_sorting"))?;
        op(self.table, &self.column, (direction, multi));
        Ok(())
    }

    pub fn clear_sorting(&self) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .clear_sorting
            .as_ref()
            .ok_or(TableError::MissingOperation("column.clear_sorting"))?;
        op(self.table, &self.column);
        Ok(())
    }

    pub fn sort_direction(&self) -> Result<Option<SortDirection>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .sort_direction
            .as_ref()
            .ok_or(TableError::MissingOperation("column.sort_direction"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn sort_index(&self) -> Result<Option<usize>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .sort_index
            .as_ref()
            .ok_or(TableError::MissingOperation("column.sort_index"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn can_sort(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .can_sort
            .as_ref()
            .ok_or(TableError::MissingOperation("column.can_sort"))?;
        Ok(op(self.table, &self.column))
    }

    // ---- faceting ---------------------------------------------------------

    pub fn faceted_row_model(&self) -> Result<Rc<crate::row::RowModel<T>>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .faceted_row_model
            .as_ref()
            .ok_or(TableError::MissingOperation("column.faceted_row_model"))?;
        op(self.table, &self.column)
    }

    /// Unique value -> count mapping in first-occurrence order.
    pub fn faceted_unique_values(
        &self,
    ) -> Result<Rc<Vec<(TableValue, usize)>>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .faceted_unique_values
            .as_ref()
            .ok_or(TableError::MissingOperation("column.faceted_unique_values"))?;
        op(self.table, &self.column)
    }

    pub fn faceted_min_max(&self) -> Result<Option<(f64, f64)>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .faceted_min_max
            .as_ref()
            .ok_or(TableError::MissingOperation("column.faceted_min_max"))?;
        op(self.table, &self.column)
    }

    // ---- grouping ---------------------------------------------------------

    pub fn toggle_grouping(&self) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .toggle_grouping
            .as_ref()
            .ok_or(TableError::MissingOperation("column.toggle_grouping"))?;
        op(self.table, &self.column);
        Ok(())
    }

    pub fn is_grouped(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .is_grouped
            .as_ref()
            .ok_or(TableError::MissingOperation("column.is_grouped"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn grouped_index(&self) -> Result<Option<usize>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .grouped_index
            .as_ref()
            .ok_or(TableError::MissingOperation("column.grouped_index"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn can_group(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .can_group
            .as_ref()
            .ok_or(TableError::MissingOperation("column.can_group"))?;
        Ok(op(self.table, &self.column))
    }

    // ---- visibility -------------------------------------------------------

    pub fn toggle_visibility(&self, visible: Option<bool>) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .toggle_visibility
            .as_ref()
            .ok_or(TableError::MissingOperation("column.toggle_visibility"))?;
        op(self.table, &self.column, visible);
        Ok(())
    }

    pub fn is_visible(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .is_visible
            .as_ref()
            .ok_or(TableError::MissingOperation("column.is_visible"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn can_hide(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .can_hide
            .as_ref()
            .ok_or(TableError::MissingOperation("column.can_hide"))?;
        Ok(op(self.table, &self.column))
    }

    // ---- pinning ----------------------------------------------------------

    pub fn pin(&self, side: Option<PinSide>) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .pin
            .as_ref()
            .ok_or(TableError::MissingOperation("column.pin"))?;
        op(self.table, &self.column, side);
        Ok(())
    }

    pub fn is_pinned(&self) -> Result<Option<PinSide>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .is_pinned
            .as_ref()
            .ok_or(TableError::MissingOperation("column.is_pinned"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn pinned_index(&self) -> Result<Option<usize>, TableError> {
        let op = self
            .table
            .ops()
            .column
            .pinned_index
            .as_ref()
            .ok_or(TableError::MissingOperation("column.pinned_index"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn can_pin(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .can_pin
            .as_ref()
            .ok_or(TableError::MissingOperation("column.can_pin"))?;
        Ok(op(self.table, &self.column))
    }

    // ---- sizing -----------------------------------------------------------

    /// Current width: committed size (or the definition's base size) clamped
    /// into [min_size, max_size], plus the live drag delta while resizing.
    pub fn size(&self) -> Result<f32, TableError> {
        let op = self
            .table
            .ops()
            .column
            .size
            .as_ref()
            .ok_or(TableError::MissingOperation("column.size"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn is_resizing(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .column
            .is_resizing
            .as_ref()
            .ok_or(TableError::MissingOperation("column.is_resizing"))?;
        Ok(op(self.table, &self.column))
    }

    pub fn start_resizing(&self) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .start_resizing
            .as_ref()
            .ok_or(TableError::MissingOperation("column.start_resizing"))?;
        op(self.table, &self.column);
        Ok(())
    }

    pub fn update_resizing(&self, delta: f32) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .update_resizing
            .as_ref()
            .ok_or(TableError::MissingOperation("column.update_resizing"))?;
        op(self.table, &self.column, delta);
        Ok(())
    }

    pub fn end_resizing(&self) -> Result<(), TableError> {
        let op = self
            .table
            .ops()
            .column
            .end_resizing
            .as_ref()
            .ok_or(TableError::MissingOperation("column.end_resizing"))?;
        op(self.table, &self.column);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Rec {
        a: i64,
    }

    #[test]
    fn test_id_derived_from_header() {
        let defs = vec![ColumnDef::<Rec> {
            header: Some("Age".to_string()),
            accessor: Some(Rc::new(|r: &Rec| TableValue::Int(r.a))),
            ..ColumnDef::empty()
        }];
        let set = build_columns(&defs).unwrap();
        assert_eq!(set.leaves[0].id, "Age");
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let defs = vec![ColumnDef::<Rec> {
            accessor: Some(Rc::new(|r: &Rec| TableValue::Int(r.a))),
            ..ColumnDef::empty()
        }];
        assert_eq!(build_columns(&defs).err(), Some(TableError::MissingColumnId));
    }

    #[test]
    fn test_duplicate_id_is_an_error() {
        let defs = vec![
            ColumnDef::<Rec>::new("a", |r| TableValue::Int(r.a)),
            ColumnDef::<Rec>::new("a", |r| TableValue::Int(r.a)),
        ];
        assert_eq!(
            build_columns(&defs).err(),
            Some(TableError::DuplicateColumnId("a".to_string()))
        );
    }

    #[test]
    fn test_nested_tree_flattens_in_definition_order() {
        let defs = vec![
            ColumnDef::<Rec>::group(
                "Info",
                vec![
                    ColumnDef::new("first", |r: &Rec| TableValue::Int(r.a)),
                    ColumnDef::new("second", |r: &Rec| TableValue::Int(r.a)),
                ],
            ),
            ColumnDef::new("third", |r: &Rec| TableValue::Int(r.a)),
        ];
        let set = build_columns(&defs).unwrap();
        let leaf_ids: Vec<&str> = set.leaves.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(leaf_ids, vec!["first", "second", "third"]);
        assert_eq!(set.by_id["first"].depth, 1);
        assert_eq!(set.by_id["first"].parent_id.as_deref(), Some("Info"));
        assert_eq!(set.by_id["third"].depth, 0);
        assert_eq!(set.roots.len(), 2);
        assert_eq!(set.flat.len(), 4);
    }
}
