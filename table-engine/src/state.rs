//! FILENAME: table-engine/src/state.rs
//! PURPOSE: Serializable table state slices and the updater protocol.
//! CONTEXT: The engine holds no state semantics of its own; every slice is a
//! plain value the host can supply, serialize, or replace. State changes flow
//! through `Updater`s so hosts can intercept them (controlled mode) or let the
//! table apply them to its internal cell (uncontrolled mode).

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::value::TableValue;

pub type ColumnId = String;
pub type RowId = String;

// ============================================================================
// FILTERING
// ============================================================================

/// The value side of an active column filter.
///
/// An "empty" value (null, empty text, unbounded range, empty set) means no
/// filter: the row always passes and the entry is dropped from state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterValue {
    Value(TableValue),
    Range { min: Option<f64>, max: Option<f64> },
    Set(Vec<TableValue>),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Value(TableValue::Null) => true,
            FilterValue::Value(TableValue::Text(s)) => s.is_empty(),
            FilterValue::Value(_) => false,
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
            FilterValue::Set(values) => values.is_empty(),
        }
    }
}

/// How a filter combines with the other active filters.
/// Filters are conjunctive unless they opt into `Or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCombinator {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub id: ColumnId,
    pub value: FilterValue,
    #[serde(default)]
    pub combinator: FilterCombinator,
}

pub type ColumnFiltersState = Vec<ColumnFilter>;

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSort {
    pub id: ColumnId,
    pub direction: SortDirection,
}

pub type SortingState = Vec<ColumnSort>;

// ============================================================================
// GROUPING / EXPANSION
// ============================================================================

/// Ordered list of column ids to group by.
pub type GroupingState = Vec<ColumnId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpandedState {
    All,
    Rows(FxHashSet<RowId>),
}

impl Default for ExpandedState {
    fn default() -> Self {
        ExpandedState::Rows(FxHashSet::default())
    }
}

impl ExpandedState {
    pub fn is_expanded(&self, row_id: &str) -> bool {
        match self {
            ExpandedState::All => true,
            ExpandedState::Rows(ids) => ids.contains(row_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ExpandedState::All => false,
            ExpandedState::Rows(ids) => ids.is_empty(),
        }
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page_index: 0,
            page_size: 10,
        }
    }
}

// ============================================================================
// COLUMN PROJECTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PinSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPinningState {
    pub left: Vec<ColumnId>,
    pub right: Vec<ColumnId>,
}

/// Per-id visibility; an absent entry means visible.
pub type ColumnVisibilityState = FxHashMap<ColumnId, bool>;

/// Per-id committed widths; an absent entry means the definition's base size.
pub type ColumnSizingState = FxHashMap<ColumnId, f32>;

/// Transient state of an in-flight column resize drag. The accumulated delta is
/// committed into `column_sizing` when the drag ends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResizingState {
    pub is_resizing: Option<ColumnId>,
    pub start_size: f32,
    pub delta: f32,
}

// ============================================================================
// TABLE STATE
// ============================================================================

/// Every state slice the built-in features read. Serde defaults make a partial
/// host-supplied state layer cleanly over internal defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableState {
    pub column_filters: ColumnFiltersState,
    pub global_filter: Option<FilterValue>,
    pub sorting: SortingState,
    pub grouping: GroupingState,
    pub expanded: ExpandedState,
    pub pagination: PaginationState,
    pub column_visibility: ColumnVisibilityState,
    pub column_pinning: ColumnPinningState,
    pub column_sizing: ColumnSizingState,
    pub column_resizing: ColumnResizingState,
}

// ============================================================================
// UPDATER PROTOCOL
// ============================================================================

/// A state change expressed as either a replacement value or a pure function of
/// the previous value. Hosts that supply an `on_<slice>_change` hook receive the
/// updater verbatim instead of the table applying it.
pub enum Updater<S> {
    Set(S),
    Apply(Rc<dyn Fn(S) -> S>),
}

impl<S> Updater<S> {
    pub fn apply(&self, old: S) -> S
    where
        S: Clone,
    {
        match self {
            Updater::Set(next) => next.clone(),
            Updater::Apply(f) => f(old),
        }
    }
}

impl<S: Clone> Clone for Updater<S> {
    fn clone(&self) -> Self {
        match self {
            Updater::Set(s) => Updater::Set(s.clone()),
            Updater::Apply(f) => Updater::Apply(f.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_values() {
        assert!(FilterValue::Value(TableValue::Null).is_empty());
        assert!(FilterValue::Value(TableValue::from("")).is_empty());
        assert!(FilterValue::Range { min: None, max: None }.is_empty());
        assert!(FilterValue::Set(vec![]).is_empty());
        assert!(!FilterValue::Value(TableValue::Int(0)).is_empty());
        assert!(!FilterValue::Range { min: Some(1.0), max: None }.is_empty());
    }

    #[test]
    fn test_state_round_trips_through_serde() {
        let mut state = TableState::default();
        state.sorting.push(ColumnSort {
            id: "age".to_string(),
            direction: SortDirection::Descending,
        });
        state.column_filters.push(ColumnFilter {
            id: "age".to_string(),
            value: FilterValue::Range { min: Some(18.0), max: Some(100.0) },
            combinator: FilterCombinator::And,
        });
        let json = serde_json::to_string(&state).unwrap();
        let back: TableState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn test_partial_state_layers_over_defaults() {
        let state: TableState =
            serde_json::from_str(r#"{"pagination":{"pageIndex":2,"pageSize":25}}"#).unwrap();
        assert_eq!(state.pagination.page_index, 2);
        assert_eq!(state.pagination.page_size, 25);
        assert!(state.sorting.is_empty());
        assert_eq!(state.expanded, ExpandedState::default());
    }

    #[test]
    fn test_updater_apply() {
        let set = Updater::Set(5usize);
        assert_eq!(set.apply(1), 5);
        let bump: Updater<usize> = Updater::Apply(Rc::new(|old| old + 1));
        assert_eq!(bump.apply(1), 2);
    }
}
