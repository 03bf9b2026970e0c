//! FILENAME: table-engine/src/features/sizing.rs
//! PURPOSE: Sizing feature - column widths and end-commit resize drags.
//! CONTEXT: Committed widths live in a sparse map over the definition's base
//! size, clamped to the definition's min/max. A resize drag accumulates its
//! delta in transient state and only commits into the sizing map when the
//! drag ends.

use std::rc::Rc;

use crate::column::{Column, RowData};
use crate::feature::{ColumnOps, TableFeature, TableOps};
use crate::state::{ColumnResizingState, ColumnSizingState, Updater};
use crate::table::Table;

pub struct SizingFeature;

impl<T: RowData> TableFeature<T> for SizingFeature {
    fn name(&self) -> &'static str {
        "sizing"
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_column_sizing = Some(Rc::new(|table, updater| {
            table.mutate_column_sizing(updater)
        }));
        ops.reset_column_sizing = Some(Rc::new(|table| {
            table.mutate_column_sizing(Updater::Set(ColumnSizingState::default()));
        }));
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.size = Some(Rc::new(|table, column| column_size(table, column)));
        ops.is_resizing = Some(Rc::new(|table, column| {
            table.read_state(|state| {
                state.column_resizing.is_resizing.as_deref() == Some(column.id.as_str())
            })
        }));
        ops.start_resizing = Some(Rc::new(|table, column| {
            if !column.def.enable_resizing {
                return;
            }
            let start_size = committed_size(table, column);
            let id = column.id.clone();
            table.mutate_column_resizing(Updater::Set(ColumnResizingState {
                is_resizing: Some(id),
                start_size,
                delta: 0.0,
            }));
        }));
        ops.update_resizing = Some(Rc::new(|table, column, delta| {
            let resizing = table.read_state(|state| {
                state.column_resizing.is_resizing.as_deref() == Some(column.id.as_str())
            });
            if !resizing {
                return;
            }
            table.mutate_column_resizing(Updater::Apply(Rc::new(
                move |old: ColumnResizingState| ColumnResizingState { delta, ..old },
            )));
        }));
        ops.end_resizing = Some(Rc::new(|table, column| end_resizing(table, column)));
    }
}

/// Committed width ignoring any in-flight drag.
fn committed_size<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) -> f32 {
    let base = table.read_state(|state| state.column_sizing.get(&column.id).copied());
    clamp(base.unwrap_or(column.def.size), column)
}

/// Effective width, including the live delta while this column is mid-drag.
fn column_size<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) -> f32 {
    let (resizing_this, delta) = table.read_state(|state| {
        (
            state.column_resizing.is_resizing.as_deref() == Some(column.id.as_str()),
            state.column_resizing.delta,
        )
    });
    let size = committed_size(table, column);
    if resizing_this {
        clamp(size + delta, column)
    } else {
        size
    }
}

fn end_resizing<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) {
    let state = table.read_state(|state| state.column_resizing.clone());
    if state.is_resizing.as_deref() != Some(column.id.as_str()) {
        return;
    }
    let committed = clamp(state.start_size + state.delta, column);
    let id = column.id.clone();
    table.mutate_column_sizing(Updater::Apply(Rc::new(move |mut old: ColumnSizingState| {
        old.insert(id.clone(), committed);
        old
    })));
    table.mutate_column_resizing(Updater::Set(ColumnResizingState::default()));
}

fn clamp<T: RowData>(size: f32, column: &Rc<Column<T>>) -> f32 {
    size.max(column.def.min_size).min(column.def.max_size)
}
