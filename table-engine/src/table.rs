//! FILENAME: table-engine/src/table.rs
//! PURPOSE: The table instance - options, state cell, composed operations and
//! the memoized derivation pipeline.
//! CONTEXT: A `Table` owns immutable construction products (resolved columns,
//! composed ops) and a `RefCell<TableState>` for uncontrolled state slices.
//! Every state change flows through one `mutate_<slice>` method; a slice whose
//! `on_<slice>_change` hook is set is controlled and the updater is handed to
//! the host verbatim instead of being applied internally. Row models derive on
//! demand through per-stage memos keyed by exact dependency tuples.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::column::{
    build_columns, AggregationFn, Column, ColumnDef, ColumnRef, ColumnSet, FilterFn, FnRef,
    RowData, SortingFn,
};
use crate::error::TableError;
use crate::feature::{compose_features, default_features, ComposedOps, TableFeature};
use crate::features::visibility;
use crate::header::{build_header_groups, Header, HeaderGroup};
use crate::memo::Memo;
use crate::row::{RowModel, RowRef};
use crate::row_model::{core, expanded, filtered, grouped, paginated, sorted};
use crate::state::{
    ColumnFiltersState, ColumnId, ColumnPinningState, ColumnResizingState,
    ColumnSizingState, ColumnVisibilityState, ExpandedState, FilterValue, GroupingState,
    PaginationState, PinSide, RowId, SortingState, TableState, Updater,
};
use crate::value::TableValue;

// ============================================================================
// OPTIONS
// ============================================================================

/// Everything a host configures up front. Immutable for the lifetime of the
/// table; runtime behavior changes go through state instead.
pub struct TableOptions<T> {
    pub data: Rc<Vec<T>>,
    pub columns: Vec<ColumnDef<T>>,
    pub features: Vec<Rc<dyn TableFeature<T>>>,

    /// Stable row identity. Without it rows are identified by their dotted
    /// index path, which shifts when the data shifts.
    pub get_row_id: Option<Rc<dyn Fn(&T, usize, Option<&str>) -> RowId>>,
    pub get_sub_rows: Option<Rc<dyn Fn(&T) -> Vec<T>>>,

    pub global_filter_fn: FnRef<FilterFn>,
    /// Named function tables; features install their built-ins here and host
    /// entries take precedence.
    pub filter_fns: FxHashMap<String, FilterFn>,
    pub sorting_fns: FxHashMap<String, SortingFn>,
    pub aggregation_fns: FxHashMap<String, AggregationFn>,

    pub enable_filters: bool,
    pub enable_sorting: bool,
    pub enable_grouping: bool,
    pub enable_expanding: bool,
    pub enable_pagination: bool,
    pub enable_hiding: bool,
    pub enable_pinning: bool,

    /// Per-slice change hooks. A set hook makes that slice controlled: the
    /// table stops applying updaters to it and the host owns the value until
    /// it writes the slice back through `set_state`.
    pub on_column_filters_change: Option<Rc<dyn Fn(Updater<ColumnFiltersState>)>>,
    pub on_global_filter_change: Option<Rc<dyn Fn(Updater<Option<FilterValue>>)>>,
    pub on_sorting_change: Option<Rc<dyn Fn(Updater<SortingState>)>>,
    pub on_grouping_change: Option<Rc<dyn Fn(Updater<GroupingState>)>>,
    pub on_expanded_change: Option<Rc<dyn Fn(Updater<ExpandedState>)>>,
    pub on_pagination_change: Option<Rc<dyn Fn(Updater<PaginationState>)>>,
    pub on_column_visibility_change: Option<Rc<dyn Fn(Updater<ColumnVisibilityState>)>>,
    pub on_column_pinning_change: Option<Rc<dyn Fn(Updater<ColumnPinningState>)>>,
    pub on_column_sizing_change: Option<Rc<dyn Fn(Updater<ColumnSizingState>)>>,
    pub on_column_resizing_change: Option<Rc<dyn Fn(Updater<ColumnResizingState>)>>,

    pub initial_state: Option<TableState>,
}

impl<T> TableOptions<T>
where
    T: RowData,
{
    pub fn new(data: Vec<T>, columns: Vec<ColumnDef<T>>) -> Self {
        TableOptions {
            data: Rc::new(data),
            columns,
            features: default_features(),
            get_row_id: None,
            get_sub_rows: None,
            global_filter_fn: FnRef::Auto,
            filter_fns: FxHashMap::default(),
            sorting_fns: FxHashMap::default(),
            aggregation_fns: FxHashMap::default(),
            enable_filters: true,
            enable_sorting: true,
            enable_grouping: true,
            enable_expanding: true,
            enable_pagination: true,
            enable_hiding: true,
            enable_pinning: true,
            on_column_filters_change: None,
            on_global_filter_change: None,
            on_sorting_change: None,
            on_grouping_change: None,
            on_expanded_change: None,
            on_pagination_change: None,
            on_column_visibility_change: None,
            on_column_pinning_change: None,
            on_column_sizing_change: None,
            on_column_resizing_change: None,
            initial_state: None,
        }
    }

    pub fn with_get_row_id(
        mut self,
        f: impl Fn(&T, usize, Option<&str>) -> RowId + 'static,
    ) -> Self {
        self.get_row_id = Some(Rc::new(f));
        self
    }

    pub fn with_get_sub_rows(mut self, f: impl Fn(&T) -> Vec<T> + 'static) -> Self {
        self.get_sub_rows = Some(Rc::new(f));
        self
    }

    pub fn with_initial_state(mut self, state: TableState) -> Self {
        self.initial_state = Some(state);
        self
    }
}

// ============================================================================
// PIPELINE CACHES
// ============================================================================

/// One memo per derivation stage plus the per-column facet caches. All slots
/// start empty; nothing derives until asked for.
struct PipelineCaches<T> {
    core: Memo<(Rc<Vec<T>>,), Rc<RowModel<T>>>,
    filtered: Memo<(Rc<RowModel<T>>, ColumnFiltersState, Option<FilterValue>), Rc<RowModel<T>>>,
    sorted: Memo<(Rc<RowModel<T>>, SortingState), Rc<RowModel<T>>>,
    grouped: Memo<(Rc<RowModel<T>>, GroupingState), Rc<RowModel<T>>>,
    expanded: Memo<(Rc<RowModel<T>>, ExpandedState), Rc<RowModel<T>>>,
    paginated: Memo<(Rc<RowModel<T>>, PaginationState), Rc<RowModel<T>>>,
    header_groups: Memo<(Vec<ColumnId>,), Rc<Vec<HeaderGroup<T>>>>,
    facets: RefCell<FxHashMap<ColumnId, Rc<FacetCache<T>>>>,
}

impl<T> PipelineCaches<T> {
    fn new() -> Self {
        PipelineCaches {
            core: Memo::new("row_model.core"),
            filtered: Memo::new("row_model.filtered"),
            sorted: Memo::new("row_model.sorted"),
            grouped: Memo::new("row_model.grouped"),
            expanded: Memo::new("row_model.expanded"),
            paginated: Memo::new("row_model.paginated"),
            header_groups: Memo::new("header_groups"),
            facets: RefCell::new(FxHashMap::default()),
        }
    }
}

/// Facet memos for one column.
pub(crate) struct FacetCache<T> {
    pub row_model:
        Memo<(Rc<RowModel<T>>, ColumnFiltersState, Option<FilterValue>), Rc<RowModel<T>>>,
    pub unique_values: Memo<(Rc<RowModel<T>>,), Rc<Vec<(TableValue, usize)>>>,
    pub min_max: Memo<(Rc<RowModel<T>>,), Option<(f64, f64)>>,
}

impl<T> FacetCache<T> {
    fn new() -> Self {
        FacetCache {
            row_model: Memo::new("facet.row_model"),
            unique_values: Memo::new("facet.unique_values"),
            min_max: Memo::new("facet.min_max"),
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

pub struct Table<T> {
    options: TableOptions<T>,
    state: RefCell<TableState>,
    columns: ColumnSet<T>,
    ops: ComposedOps<T>,
    caches: PipelineCaches<T>,
}

impl<T: RowData> Table<T> {
    /// Resolves columns, composes the registered features and validates their
    /// structural dependencies. Construction is the only fallible phase for
    /// column and feature configuration.
    pub fn new(mut options: TableOptions<T>) -> Result<Self, TableError> {
        let features = options.features.clone();
        let mut state = options.initial_state.clone().unwrap_or_default();
        let ops = compose_features(&features, &mut options, &mut state)?;
        let columns = build_columns(&options.columns)?;
        log::debug!(
            "table created: {} columns ({} leaves), {} rows, {} features",
            columns.flat.len(),
            columns.leaves.len(),
            options.data.len(),
            features.len()
        );
        Ok(Table {
            options,
            state: RefCell::new(state),
            columns,
            ops,
            caches: PipelineCaches::new(),
        })
    }

    pub fn options(&self) -> &TableOptions<T> {
        &self.options
    }

    pub fn ops(&self) -> &ComposedOps<T> {
        &self.ops
    }

    // ---- state ------------------------------------------------------------

    pub fn state(&self) -> TableState {
        self.state.borrow().clone()
    }

    /// Replaces the whole state. This is also how a controlled host writes a
    /// slice back after handling its updater.
    pub fn set_state(&self, state: TableState) {
        *self.state.borrow_mut() = state;
    }

    pub(crate) fn read_state<R>(&self, f: impl FnOnce(&TableState) -> R) -> R {
        f(&self.state.borrow())
    }

    // ---- row models -------------------------------------------------------

    pub fn core_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.caches
            .core
            .try_get_or_insert_with((self.options.data.clone(),), || {
                core::build_core_row_model(self)
            })
    }

    pub fn filtered_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        let input = self.core_row_model()?;
        let (filters, global) =
            self.read_state(|s| (s.column_filters.clone(), s.global_filter.clone()));
        self.caches.filtered.try_get_or_insert_with(
            (input.clone(), filters.clone(), global.clone()),
            || filtered::filter_rows(self, &input, &filters, global.as_ref()),
        )
    }

    pub fn sorted_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        let input = self.filtered_row_model()?;
        let sorting = self.read_state(|s| s.sorting.clone());
        self.caches
            .sorted
            .try_get_or_insert_with((input.clone(), sorting.clone()), || {
                sorted::sort_rows(self, &input, &sorting)
            })
    }

    pub fn grouped_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        let input = self.sorted_row_model()?;
        let grouping = self.read_state(|s| s.grouping.clone());
        self.caches
            .grouped
            .try_get_or_insert_with((input.clone(), grouping.clone()), || {
                grouped::group_rows(self, &input, &grouping)
            })
    }

    pub fn expanded_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        let input = self.grouped_row_model()?;
        let expanded = self.read_state(|s| s.expanded.clone());
        self.caches
            .expanded
            .try_get_or_insert_with((input.clone(), expanded.clone()), || {
                Ok(expanded::expand_rows(self, &input, &expanded))
            })
    }

    pub fn paginated_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        let input = self.expanded_row_model()?;
        let pagination = self.read_state(|s| s.pagination);
        self.caches
            .paginated
            .try_get_or_insert_with((input.clone(), pagination), || {
                Ok(paginated::paginate_rows(self, &input, &pagination))
            })
    }

    /// The fully derived model: what a host renders.
    pub fn row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.paginated_row_model()
    }

    // Pre-stage views: each stage's input, by the stage it feeds.
    pub fn pre_filtered_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.core_row_model()
    }

    pub fn pre_sorted_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.filtered_row_model()
    }

    pub fn pre_grouped_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.sorted_row_model()
    }

    pub fn pre_expanded_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.grouped_row_model()
    }

    pub fn pre_paginated_row_model(&self) -> Result<Rc<RowModel<T>>, TableError> {
        self.expanded_row_model()
    }

    pub(crate) fn facet_cache(&self, column_id: &str) -> Rc<FacetCache<T>> {
        self.caches
            .facets
            .borrow_mut()
            .entry(column_id.to_string())
            .or_insert_with(|| Rc::new(FacetCache::new()))
            .clone()
    }

    // ---- rows -------------------------------------------------------------

    /// The current page's rows as handles.
    pub fn rows(&self) -> Result<Vec<RowRef<'_, T>>, TableError> {
        let model = self.row_model()?;
        Ok(model
            .rows
            .iter()
            .map(|row| RowRef {
                table: self,
                row: row.clone(),
            })
            .collect())
    }

    /// Looks a row up by id across the grouped model, so synthetic group rows
    /// resolve too. `None` for an id the current derivation does not contain.
    pub fn row(&self, id: &str) -> Result<Option<RowRef<'_, T>>, TableError> {
        let model = self.grouped_row_model()?;
        Ok(model.rows_by_id.get(id).map(|row| RowRef {
            table: self,
            row: row.clone(),
        }))
    }

    // ---- columns ----------------------------------------------------------

    /// Every resolved column, depth-first, parents before children.
    pub fn all_columns(&self) -> &[Rc<Column<T>>] {
        &self.columns.flat
    }

    /// Leaf columns in definition order, visibility ignored.
    pub fn leaf_columns(&self) -> &[Rc<Column<T>>] {
        &self.columns.leaves
    }

    pub(crate) fn column_by_id(&self, id: &str) -> Option<Rc<Column<T>>> {
        self.columns.by_id.get(id).cloned()
    }

    pub fn column(&self, id: &str) -> Option<ColumnRef<'_, T>> {
        self.column_by_id(id).map(|column| ColumnRef {
            table: self,
            column,
        })
    }

    /// Visible leaves in render order: pinned-left, then center, then
    /// pinned-right.
    pub fn visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        let mut columns = self.left_visible_leaf_columns();
        columns.extend(self.center_visible_leaf_columns());
        columns.extend(self.right_visible_leaf_columns());
        columns
    }

    pub fn left_visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        self.pinned_partition(Some(PinSide::Left))
    }

    pub fn center_visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        self.pinned_partition(None)
    }

    pub fn right_visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        self.pinned_partition(Some(PinSide::Right))
    }

    /// Pinned sides keep pin order; the center keeps definition order.
    fn pinned_partition(&self, side: Option<PinSide>) -> Vec<Rc<Column<T>>> {
        self.read_state(|state| {
            let pinning = &state.column_pinning;
            let visible = |column: &Rc<Column<T>>| visibility::column_is_visible(self, column);
            match side {
                Some(PinSide::Left) => pinning
                    .left
                    .iter()
                    .filter_map(|id| self.column_by_id(id))
                    .filter(|column| column.is_leaf())
                    .filter(visible)
                    .collect(),
                Some(PinSide::Right) => pinning
                    .right
                    .iter()
                    .filter_map(|id| self.column_by_id(id))
                    .filter(|column| column.is_leaf())
                    .filter(visible)
                    .collect(),
                None => self
                    .columns
                    .leaves
                    .iter()
                    .filter(|column| {
                        !pinning.left.contains(&column.id) && !pinning.right.contains(&column.id)
                    })
                    .cloned()
                    .filter(|column| visibility::column_is_visible(self, column))
                    .collect(),
            }
        })
    }

    // ---- headers ----------------------------------------------------------

    /// Header groups over the current visible/pinned leaf order, top level
    /// first. Memoized on the ordered leaf ids.
    pub fn header_groups(&self) -> Rc<Vec<HeaderGroup<T>>> {
        let leaves = self.visible_leaf_columns();
        let ids: Vec<ColumnId> = leaves.iter().map(|c| c.id.clone()).collect();
        self.caches.header_groups.get_or_insert_with((ids,), || {
            Rc::new(build_header_groups(&leaves, &self.columns.by_id))
        })
    }

    /// Every header across every group, top level first.
    pub fn flat_headers(&self) -> Vec<Header<T>> {
        self.header_groups()
            .iter()
            .flat_map(|group| group.headers.iter().cloned())
            .collect()
    }

    /// The deepest level's headers, one per visible leaf.
    pub fn leaf_headers(&self) -> Vec<Header<T>> {
        self.header_groups()
            .last()
            .map(|group| group.headers.clone())
            .unwrap_or_default()
    }

    // ---- state mutation ---------------------------------------------------

    pub(crate) fn mutate_column_filters(&self, updater: Updater<ColumnFiltersState>) {
        if let Some(hook) = &self.options.on_column_filters_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.column_filters.clone()));
        log::debug!("state change: column_filters ({} active)", next.len());
        self.state.borrow_mut().column_filters = next;
    }

    pub(crate) fn mutate_global_filter(&self, updater: Updater<Option<FilterValue>>) {
        if let Some(hook) = &self.options.on_global_filter_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.global_filter.clone()));
        log::debug!("state change: global_filter");
        self.state.borrow_mut().global_filter = next;
    }

    pub(crate) fn mutate_sorting(&self, updater: Updater<SortingState>) {
        if let Some(hook) = &self.options.on_sorting_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.sorting.clone()));
        log::debug!("state change: sorting ({} keys)", next.len());
        self.state.borrow_mut().sorting = next;
    }

    pub(crate) fn mutate_grouping(&self, updater: Updater<GroupingState>) {
        if let Some(hook) = &self.options.on_grouping_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.grouping.clone()));
        log::debug!("state change: grouping ({} columns)", next.len());
        self.state.borrow_mut().grouping = next;
    }

    pub(crate) fn mutate_expanded(&self, updater: Updater<ExpandedState>) {
        if let Some(hook) = &self.options.on_expanded_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.expanded.clone()));
        log::debug!("state change: expanded");
        self.state.borrow_mut().expanded = next;
    }

    pub(crate) fn mutate_pagination(&self, updater: Updater<PaginationState>) {
        if let Some(hook) = &self.options.on_pagination_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.pagination));
        log::debug!(
            "state change: pagination (page {} x {})",
            next.page_index,
            next.page_size
        );
        self.state.borrow_mut().pagination = next;
    }

    pub(crate) fn mutate_column_visibility(&self, updater: Updater<ColumnVisibilityState>) {
        if let Some(hook) = &self.options.on_column_visibility_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.column_visibility.clone()));
        log::debug!("state change: column_visibility ({} entries)", next.len());
        self.state.borrow_mut().column_visibility = next;
    }

    pub(crate) fn mutate_column_pinning(&self, updater: Updater<ColumnPinningState>) {
        if let Some(hook) = &self.options.on_column_pinning_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.column_pinning.clone()));
        log::debug!("state change: column_pinning");
        self.state.borrow_mut().column_pinning = next;
    }

    pub(crate) fn mutate_column_sizing(&self, updater: Updater<ColumnSizingState>) {
        if let Some(hook) = &self.options.on_column_sizing_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.column_sizing.clone()));
        log::debug!("state change: column_sizing ({} entries)", next.len());
        self.state.borrow_mut().column_sizing = next;
    }

    pub(crate) fn mutate_column_resizing(&self, updater: Updater<ColumnResizingState>) {
        if let Some(hook) = &self.options.on_column_resizing_change {
            hook(updater);
            return;
        }
        let next = updater.apply(self.read_state(|s| s.column_resizing.clone()));
        log::debug!("state change: column_resizing");
        self.state.borrow_mut().column_resizing = next;
    }

    // ---- table-level operation dispatch -----------------------------------

    pub fn set_column_filter(&self, column_id: &str, value: FilterValue) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_column_filter
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_column_filter"))?;
        op(self, (column_id.to_string(), value));
        Ok(())
    }

    pub fn set_global_filter(&self, value: Option<FilterValue>) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_global_filter
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_global_filter"))?;
        op(self, value);
        Ok(())
    }

    pub fn reset_column_filters(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .reset_column_filters
            .as_ref()
            .ok_or(TableError::MissingOperation("table.reset_column_filters"))?;
        op(self);
        Ok(())
    }

    pub fn set_sorting(&self, updater: Updater<SortingState>) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_sorting
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_sorting"))?;
        op(self, updater);
        Ok(())
    }

    pub fn reset_sorting(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .reset_sorting
            .as_ref()
            .ok_or(TableError::MissingOperation("table.reset_sorting"))?;
        op(self);
        Ok(())
    }

    pub fn set_grouping(&self, updater: Updater<GroupingState>) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_grouping
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_grouping"))?;
        op(self, updater);
        Ok(())
    }

    pub fn set_expanded(&self, updater: Updater<ExpandedState>) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_expanded
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_expanded"))?;
        op(self, updater);
        Ok(())
    }

    pub fn toggle_all_rows_expanded(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .toggle_all_rows_expanded
            .as_ref()
            .ok_or(TableError::MissingOperation("table.toggle_all_rows_expanded"))?;
        op(self);
        Ok(())
    }

    pub fn is_all_rows_expanded(&self) -> Result<bool, TableError> {
        let op = self
            .ops
            .table
            .is_all_rows_expanded
            .as_ref()
            .ok_or(TableError::MissingOperation("table.is_all_rows_expanded"))?;
        Ok(op(self))
    }

    pub fn set_page_index(&self, index: usize) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_page_index
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_page_index"))?;
        op(self, index);
        Ok(())
    }

    pub fn set_page_size(&self, size: usize) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_page_size
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_page_size"))?;
        op(self, size);
        Ok(())
    }

    pub fn reset_page_index(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .reset_page_index
            .as_ref()
            .ok_or(TableError::MissingOperation("table.reset_page_index"))?;
        op(self);
        Ok(())
    }

    pub fn next_page(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .next_page
            .as_ref()
            .ok_or(TableError::MissingOperation("table.next_page"))?;
        op(self)
    }

    pub fn previous_page(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .previous_page
            .as_ref()
            .ok_or(TableError::MissingOperation("table.previous_page"))?;
        op(self)
    }

    pub fn page_count(&self) -> Result<usize, TableError> {
        let op = self
            .ops
            .table
            .page_count
            .as_ref()
            .ok_or(TableError::MissingOperation("table.page_count"))?;
        op(self)
    }

    pub fn can_next_page(&self) -> Result<bool, TableError> {
        let op = self
            .ops
            .table
            .can_next_page
            .as_ref()
            .ok_or(TableError::MissingOperation("table.can_next_page"))?;
        op(self)
    }

    pub fn can_previous_page(&self) -> Result<bool, TableError> {
        let op = self
            .ops
            .table
            .can_previous_page
            .as_ref()
            .ok_or(TableError::MissingOperation("table.can_previous_page"))?;
        op(self)
    }

    pub fn set_column_visibility(
        &self,
        updater: Updater<ColumnVisibilityState>,
    ) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_column_visibility
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_column_visibility"))?;
        op(self, updater);
        Ok(())
    }

    pub fn toggle_all_columns_visible(&self, visible: Option<bool>) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .toggle_all_columns_visible
            .as_ref()
            .ok_or(TableError::MissingOperation(
                "table.toggle_all_columns_visible",
            ))?;
        op(self, visible);
        Ok(())
    }

    pub fn is_all_columns_visible(&self) -> Result<bool, TableError> {
        let op = self
            .ops
            .table
            .is_all_columns_visible
            .as_ref()
            .ok_or(TableError::MissingOperation("table.is_all_columns_visible"))?;
        Ok(op(self))
    }

    pub fn set_column_pinning(
        &self,
        updater: Updater<ColumnPinningState>,
    ) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_column_pinning
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_column_pinning"))?;
        op(self, updater);
        Ok(())
    }

    pub fn is_some_columns_pinned(&self, side: Option<PinSide>) -> Result<bool, TableError> {
        let op = self
            .ops
            .table
            .is_some_columns_pinned
            .as_ref()
            .ok_or(TableError::MissingOperation("table.is_some_columns_pinned"))?;
        Ok(op(self, side))
    }

    pub fn set_column_sizing(&self, updater: Updater<ColumnSizingState>) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .set_column_sizing
            .as_ref()
            .ok_or(TableError::MissingOperation("table.set_column_sizing"))?;
        op(self, updater);
        Ok(())
    }

    pub fn reset_column_sizing(&self) -> Result<(), TableError> {
        let op = self
            .ops
            .table
            .reset_column_sizing
            .as_ref()
            .ok_or(TableError::MissingOperation("table.reset_column_sizing"))?;
        op(self);
        Ok(())
    }
}
