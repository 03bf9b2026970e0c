//! FILENAME: table-engine/src/features/visibility.rs
//! PURPOSE: Visibility feature - column show/hide state and visible cell lists.
//! CONTEXT: Visibility state is a sparse map; absent ids are visible. Group
//! columns have no entry of their own and count as visible while any
//! descendant leaf is.

use std::rc::Rc;

use crate::cell::CellRef;
use crate::column::{Column, RowData};
use crate::feature::{ColumnOps, RowOps, TableFeature, TableOps};
use crate::state::{ColumnVisibilityState, Updater};
use crate::table::Table;

pub struct VisibilityFeature;

impl<T: RowData> TableFeature<T> for VisibilityFeature {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_column_visibility = Some(Rc::new(|table, updater| {
            table.mutate_column_visibility(updater)
        }));
        ops.toggle_all_columns_visible = Some(Rc::new(|table, desired| {
            let visible = desired.unwrap_or_else(|| !all_columns_visible(table));
            let next: ColumnVisibilityState = if visible {
                ColumnVisibilityState::default()
            } else {
                table
                    .leaf_columns()
                    .iter()
                    .filter(|c| can_hide_column(table, c))
                    .map(|c| (c.id.clone(), false))
                    .collect()
            };
            table.mutate_column_visibility(Updater::Set(next));
        }));
        ops.is_all_columns_visible = Some(Rc::new(|table| all_columns_visible(table)));
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.toggle_visibility = Some(Rc::new(|table, column, desired| {
            if !can_hide_column(table, column) {
                return;
            }
            let id = column.id.clone();
            let visible = desired.unwrap_or_else(|| !column_is_visible(table, column));
            table.mutate_column_visibility(Updater::Apply(Rc::new(
                move |mut old: ColumnVisibilityState| {
                    if visible {
                        old.remove(&id);
                    } else {
                        old.insert(id.clone(), false);
                    }
                    old
                },
            )));
        }));
        ops.is_visible = Some(Rc::new(|table, column| column_is_visible(table, column)));
        ops.can_hide = Some(Rc::new(|table, column| can_hide_column(table, column)));
    }

    fn row_ops(&self, ops: &mut RowOps<T>) {
        ops.visible_cells = Some(Rc::new(|table, row| {
            table
                .visible_leaf_columns()
                .into_iter()
                .map(|column| CellRef {
                    table,
                    row: row.clone(),
                    column,
                })
                .collect()
        }));
    }
}

pub(crate) fn column_is_visible<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) -> bool {
    if column.is_leaf() {
        table.read_state(|state| {
            state
                .column_visibility
                .get(&column.id)
                .copied()
                .unwrap_or(true)
        })
    } else {
        column
            .children
            .iter()
            .any(|child| column_is_visible(table, child))
    }
}

fn can_hide_column<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) -> bool {
    column.def.enable_hiding && table.options().enable_hiding
}

fn all_columns_visible<T: RowData>(table: &Table<T>) -> bool {
    table
        .leaf_columns()
        .iter()
        .all(|c| column_is_visible(table, c))
}
