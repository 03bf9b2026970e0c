//! FILENAME: table-engine/src/lib.rs
//! Headless table state engine.
//!
//! This crate derives table views from raw row data and declarative column
//! definitions. It renders nothing: the output is row models, column
//! projections and header groups that a host (GUI, TUI, report generator)
//! turns into pixels. All behavior beyond the core derivation pipeline is
//! packaged as composable features.
//!
//! Layers:
//! - `value`/`state`: Dynamic cell values and serializable state slices
//! - `column`/`row`/`cell`/`header`: Entities and their dispatch handles
//! - `feature`/`features`: The capability-slot registry and the built-ins
//! - `row_model`: The core -> filtered -> sorted -> grouped -> expanded ->
//!   paginated derivation pipeline, plus the faceted side-branch
//! - `memo`/`table`: Dependency-keyed caches and the table instance tying
//!   everything together

pub mod cell;
pub mod column;
pub mod error;
pub mod feature;
pub mod features;
pub mod header;
pub mod memo;
pub mod row;
pub mod row_model;
pub mod state;
pub mod table;
pub mod value;

pub use cell::CellRef;
pub use column::{
    Accessor, AggregationFn, Column, ColumnDef, ColumnRef, FilterFn, FnRef, RowData, SortingFn,
};
pub use error::TableError;
pub use feature::{default_features, ComposedOps, TableFeature};
pub use header::{Header, HeaderGroup};
pub use row::{Row, RowModel, RowRef};
pub use state::{
    ColumnFilter, ColumnFiltersState, ColumnId, ColumnPinningState, ColumnResizingState,
    ColumnSizingState, ColumnSort, ColumnVisibilityState, ExpandedState, FilterCombinator,
    FilterValue, GroupingState, PaginationState, PinSide, RowId, SortDirection, SortingState,
    TableState, Updater,
};
pub use table::{Table, TableOptions};
pub use value::TableValue;
