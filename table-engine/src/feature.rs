//! FILENAME: table-engine/src/feature.rs
//! PURPOSE: Feature registry and the API composition engine.
//! CONTEXT: Features are self-contained bundles of default state, default
//! options and entity operations. Composition runs once at construction: each
//! feature, in declaration order, fills typed capability slots on the shared
//! per-entity-kind op tables. A later feature assigning an already-filled slot
//! overwrites it (deliberate overlay semantics, covered by regression tests).
//! Structural dependencies between features are validated after all
//! contributors run and fail construction, never degrade to no-ops.

use std::rc::Rc;

use crate::cell::CellRef;
use crate::column::{Column, RowData};
use crate::error::TableError;
use crate::row::{Row, RowModel};
use crate::state::{
    ColumnId, ColumnPinningState, ColumnSizingState, ColumnVisibilityState,
    ExpandedState, FilterValue, GroupingState, PinSide, SortDirection, SortingState, TableState,
    Updater,
};
use crate::table::{Table, TableOptions};
use crate::value::TableValue;

// ============================================================================
// OPERATION SIGNATURES
// ============================================================================

pub type TableOp<T, R> = Rc<dyn Fn(&Table<T>) -> R>;
pub type TableOp1<T, A, R> = Rc<dyn Fn(&Table<T>, A) -> R>;
pub type ColumnOp<T, R> = Rc<dyn Fn(&Table<T>, &Rc<Column<T>>) -> R>;
pub type ColumnOp1<T, A, R> = Rc<dyn Fn(&Table<T>, &Rc<Column<T>>, A) -> R>;
pub type RowOp<T, R> = Rc<dyn Fn(&Table<T>, &Rc<Row<T>>) -> R>;
pub type RowOp1<T, A, R> = Rc<dyn Fn(&Table<T>, &Rc<Row<T>>, A) -> R>;
pub type RowCellsOp<T> = Rc<dyn for<'t> Fn(&'t Table<T>, &Rc<Row<T>>) -> Vec<CellRef<'t, T>>>;
pub type CellOp<T, R> = Rc<dyn Fn(&Table<T>, &Rc<Row<T>>, &Rc<Column<T>>) -> R>;

// ============================================================================
// CAPABILITY SLOT TABLES
// ============================================================================

/// Table-level operation slots.
pub struct TableOps<T> {
    pub set_column_filter: Option<TableOp1<T, (ColumnId, FilterValue), ()>>,
    pub set_global_filter: Option<TableOp1<T, Option<FilterValue>, ()>>,
    pub reset_column_filters: Option<TableOp<T, ()>>,

    pub set_sorting: Option<TableOp1<T, Updater<SortingState>, ()>>,
    pub reset_sorting: Option<TableOp<T, ()>>,

    pub set_grouping: Option<TableOp1<T, Updater<GroupingState>, ()>>,

    pub set_expanded: Option<TableOp1<T, Updater<ExpandedState>, ()>>,
    pub toggle_all_rows_expanded: Option<TableOp<T, ()>>,
    pub is_all_rows_expanded: Option<TableOp<T, bool>>,

    pub set_page_index: Option<TableOp1<T, usize, ()>>,
    pub set_page_size: Option<TableOp1<T, usize, ()>>,
    pub reset_page_index: Option<TableOp<T, ()>>,
    pub next_page: Option<TableOp<T, Result<(), TableError>>>,
    pub previous_page: Option<TableOp<T, Result<(), TableError>>>,
    pub page_count: Option<TableOp<T, Result<usize, TableError>>>,
    pub can_next_page: Option<TableOp<T, Result<bool, TableError>>>,
    pub can_previous_page: Option<TableOp<T, Result<bool, TableError>>>,

    pub set_column_visibility: Option<TableOp1<T, Updater<ColumnVisibilityState>, ()>>,
    pub toggle_all_columns_visible: Option<TableOp1<T, Option<bool>, ()>>,
    pub is_all_columns_visible: Option<TableOp<T, bool>>,

    pub set_column_pinning: Option<TableOp1<T, Updater<ColumnPinningState>, ()>>,
    pub is_some_columns_pinned: Option<TableOp1<T, Option<PinSide>, bool>>,

    pub set_column_sizing: Option<TableOp1<T, Updater<ColumnSizingState>, ()>>,
    pub reset_column_sizing: Option<TableOp<T, ()>>,
}

/// Column-level operation slots.
pub struct ColumnOps<T> {
    pub filter_value: Option<ColumnOp<T, Option<FilterValue>>>,
    pub set_filter_value: Option<ColumnOp1<T, FilterValue, ()>>,
    pub can_filter: Option<ColumnOp<T, bool>>,

    pub toggle_sorting: Option<ColumnOp1<T, (Option<SortDirection>, bool), ()>>,
    pub clear_sorting: Option<ColumnOp<T, ()>>,
    pub sort_direction: Option<ColumnOp<T, Option<SortDirection>>>,
    pub sort_index: Option<ColumnOp<T, Option<usize>>>,
    pub can_sort: Option<ColumnOp<T, bool>>,

    pub faceted_row_model: Option<ColumnOp<T, Result<Rc<RowModel<T>>, TableError>>>,
    pub faceted_unique_values:
        Option<ColumnOp<T, Result<Rc<Vec<(TableValue, usize)>>, TableError>>>,
    pub faceted_min_max: Option<ColumnOp<T, Result<Option<(f64, f64)>, TableError>>>,

    pub toggle_grouping: Option<ColumnOp<T, ()>>,
    pub is_grouped: Option<ColumnOp<T, bool>>,
    pub grouped_index: Option<ColumnOp<T, Option<usize>>>,
    pub can_group: Option<ColumnOp<T, bool>>,

    pub toggle_visibility: Option<ColumnOp1<T, Option<bool>, ()>>,
    pub is_visible: Option<ColumnOp<T, bool>>,
    pub can_hide: Option<ColumnOp<T, bool>>,

    pub pin: Option<ColumnOp1<T, Option<PinSide>, ()>>,
    pub is_pinned: Option<ColumnOp<T, Option<PinSide>>>,
    pub pinned_index: Option<ColumnOp<T, Option<usize>>>,
    pub can_pin: Option<ColumnOp<T, bool>>,

    pub size: Option<ColumnOp<T, f32>>,
    pub is_resizing: Option<ColumnOp<T, bool>>,
    pub start_resizing: Option<ColumnOp<T, ()>>,
    pub update_resizing: Option<ColumnOp1<T, f32, ()>>,
    pub end_resizing: Option<ColumnOp<T, ()>>,
}

/// Row-level operation slots.
pub struct RowOps<T> {
    pub toggle_expanded: Option<RowOp1<T, Option<bool>, Result<(), TableError>>>,
    pub is_expanded: Option<RowOp<T, bool>>,
    pub can_expand: Option<RowOp<T, bool>>,

    pub visible_cells: Option<RowCellsOp<T>>,
    pub left_visible_cells: Option<RowCellsOp<T>>,
    pub center_visible_cells: Option<RowCellsOp<T>>,
    pub right_visible_cells: Option<RowCellsOp<T>>,
}

/// Cell-level operation slots.
pub struct CellOps<T> {
    pub is_grouped: Option<CellOp<T, bool>>,
    pub is_aggregated: Option<CellOp<T, bool>>,
    pub is_placeholder: Option<CellOp<T, bool>>,
}

/// All four slot tables, resolved once at construction.
pub struct ComposedOps<T> {
    pub table: TableOps<T>,
    pub column: ColumnOps<T>,
    pub row: RowOps<T>,
    pub cell: CellOps<T>,
}

impl<T> Default for TableOps<T> {
    fn default() -> Self {
        TableOps {
            set_column_filter: None,
            set_global_filter: None,
            reset_column_filters: None,
            set_sorting: None,
            reset_sorting: None,
            set_grouping: None,
            set_expanded: None,
            toggle_all_rows_expanded: None,
            is_all_rows_expanded: None,
            set_page_index: None,
            set_page_size: None,
            reset_page_index: None,
            next_page: None,
            previous_page: None,
            page_count: None,
            can_next_page: None,
            can_previous_page: None,
            set_column_visibility: None,
            toggle_all_columns_visible: None,
            is_all_columns_visible: None,
            set_column_pinning: None,
            is_some_columns_pinned: None,
            set_column_sizing: None,
            reset_column_sizing: None,
        }
    }
}

impl<T> Default for ColumnOps<T> {
    fn default() -> Self {
        ColumnOps {
            filter_value: None,
            set_filter_value: None,
            can_filter: None,
            toggle_sorting: None,
            clear_sorting: None,
            sort_direction: None,
            sort_index: None,
            can_sort: None,
            faceted_row_model: None,
            faceted_unique_values: None,
            faceted_min_max: None,
            toggle_grouping: None,
            is_grouped: None,
            grouped_index: None,
            can_group: None,
            toggle_visibility: None,
            is_visible: None,
            can_hide: None,
            pin: None,
            is_pinned: None,
            pinned_index: None,
            can_pin: None,
            size: None,
            is_resizing: None,
            start_resizing: None,
            update_resizing: None,
            end_resizing: None,
        }
    }
}

impl<T> Default for RowOps<T> {
    fn default() -> Self {
        RowOps {
            toggle_expanded: None,
            is_expanded: None,
            can_expand: None,
            visible_cells: None,
            left_visible_cells: None,
            center_visible_cells: None,
            right_visible_cells: None,
        }
    }
}

impl<T> Default for CellOps<T> {
    fn default() -> Self {
        CellOps {
            is_grouped: None,
            is_aggregated: None,
            is_placeholder: None,
        }
    }
}

impl<T> Default for ComposedOps<T> {
    fn default() -> Self {
        ComposedOps {
            table: TableOps::default(),
            column: ColumnOps::default(),
            row: RowOps::default(),
            cell: CellOps::default(),
        }
    }
}

// ============================================================================
// FEATURE TRAIT
// ============================================================================

/// A self-contained feature module. Contributors must rely only on slots
/// filled by earlier-declared features; `validate` runs after every
/// contributor and turns a missing structural dependency into a construction
/// error.
pub trait TableFeature<T: RowData> {
    fn name(&self) -> &'static str;

    /// Installs this feature's default state slice values.
    fn init_state(&self, _state: &mut TableState) {}

    /// Installs default options, e.g. built-in named function tables.
    fn init_options(&self, _options: &mut TableOptions<T>) {}

    fn table_ops(&self, _ops: &mut TableOps<T>) {}
    fn column_ops(&self, _ops: &mut ColumnOps<T>) {}
    fn row_ops(&self, _ops: &mut RowOps<T>) {}
    fn cell_ops(&self, _ops: &mut CellOps<T>) {}

    fn validate(&self, _ops: &ComposedOps<T>) -> Result<(), TableError> {
        Ok(())
    }
}

/// Runs the composition: state/options defaults first, then the four
/// contributors per feature in declaration order, then validation.
pub(crate) fn compose_features<T: RowData>(
    features: &[Rc<dyn TableFeature<T>>],
    options: &mut TableOptions<T>,
    state: &mut TableState,
) -> Result<ComposedOps<T>, TableError> {
    let mut ops = ComposedOps::default();
    for feature in features {
        log::trace!("composing feature: {}", feature.name());
        feature.init_state(state);
        feature.init_options(options);
    }
    for feature in features {
        feature.table_ops(&mut ops.table);
        feature.column_ops(&mut ops.column);
        feature.row_ops(&mut ops.row);
        feature.cell_ops(&mut ops.cell);
    }
    for feature in features {
        feature.validate(&ops)?;
    }
    Ok(ops)
}

/// The built-in registry, in declaration order.
pub fn default_features<T: RowData>() -> Vec<Rc<dyn TableFeature<T>>> {
    vec![
        Rc::new(crate::features::filters::FiltersFeature),
        Rc::new(crate::features::sorting::SortingFeature),
        Rc::new(crate::features::faceting::FacetingFeature),
        Rc::new(crate::features::expanding::ExpandingFeature),
        Rc::new(crate::features::grouping::GroupingFeature),
        Rc::new(crate::features::pagination::PaginationFeature),
        Rc::new(crate::features::visibility::VisibilityFeature),
        Rc::new(crate::features::pinning::PinningFeature),
        Rc::new(crate::features::sizing::SizingFeature),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;
    use crate::features::filters::FiltersFeature;
    use crate::features::faceting::FacetingFeature;

    #[derive(Clone)]
    struct Rec {
        n: i64,
    }

    fn options_with_features(
        features: Vec<Rc<dyn TableFeature<Rec>>>,
    ) -> TableOptions<Rec> {
        let mut options = TableOptions::new(
            vec![Rec { n: 1 }],
            vec![ColumnDef::new("n", |r: &Rec| TableValue::Int(r.n))],
        );
        options.features = features;
        options
    }

    struct ExpandedAlwaysFalse;
    impl TableFeature<Rec> for ExpandedAlwaysFalse {
        fn name(&self) -> &'static str {
            "expanded-always-false"
        }
        fn table_ops(&self, ops: &mut TableOps<Rec>) {
            ops.is_all_rows_expanded = Some(Rc::new(|_table| false));
        }
    }

    struct ExpandedAlwaysTrue;
    impl TableFeature<Rec> for ExpandedAlwaysTrue {
        fn name(&self) -> &'static str {
            "expanded-always-true"
        }
        fn table_ops(&self, ops: &mut TableOps<Rec>) {
            ops.is_all_rows_expanded = Some(Rc::new(|_table| true));
        }
    }

    #[test]
    fn test_later_feature_overwrites_identically_named_operation() {
        // Declaration order decides the winner, both ways around.
        let table = Table::new(options_with_features(vec![
            Rc::new(ExpandedAlwaysFalse),
            Rc::new(ExpandedAlwaysTrue),
        ]))
        .unwrap();
        assert_eq!(table.is_all_rows_expanded().unwrap(), true);

        let table = Table::new(options_with_features(vec![
            Rc::new(ExpandedAlwaysTrue),
            Rc::new(ExpandedAlwaysFalse),
        ]))
        .unwrap();
        assert_eq!(table.is_all_rows_expanded().unwrap(), false);
    }

    #[test]
    fn test_structural_dependency_fails_at_composition() {
        // Faceting restricts its input by the other columns' filters, so it
        // requires the filters feature.
        let err = Table::new(options_with_features(vec![Rc::new(FacetingFeature)]))
            .err()
            .unwrap();
        assert_eq!(
            err,
            TableError::MissingFeature {
                feature: "faceting",
                requires: "filters",
            }
        );
    }

    #[test]
    fn test_absent_feature_operation_fails_at_call_time() {
        let table =
            Table::new(options_with_features(vec![Rc::new(FiltersFeature)])).unwrap();
        let column = table.column("n").unwrap();
        assert_eq!(
            column.toggle_sorting(None, false).unwrap_err(),
            TableError::MissingOperation("column.toggle_sorting")
        );
        // Operations that are present keep working.
        assert!(column.can_filter().unwrap());
    }

    #[test]
    fn test_default_registry_composes_and_validates() {
        let table = Table::new(options_with_features(default_features())).unwrap();
        let ops = table.ops();
        assert!(ops.table.set_sorting.is_some());
        assert!(ops.column.faceted_unique_values.is_some());
        assert!(ops.row.visible_cells.is_some());
        assert!(ops.cell.is_aggregated.is_some());
    }
}
