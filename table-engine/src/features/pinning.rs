//! FILENAME: table-engine/src/features/pinning.rs
//! PURPOSE: Pinning feature - left/right column partitions and cell lists.
//! CONTEXT: Pinning state holds ordered leaf-column id lists per side.
//! Pinning a group column pins every leaf under it; a leaf id lives in at
//! most one side at a time.

use std::rc::Rc;

use crate::cell::CellRef;
use crate::column::{Column, RowData};
use crate::feature::{ColumnOps, RowOps, TableFeature, TableOps};
use crate::row::Row;
use crate::state::{ColumnPinningState, PinSide, Updater};
use crate::table::Table;

pub struct PinningFeature;

impl<T: RowData> TableFeature<T> for PinningFeature {
    fn name(&self) -> &'static str {
        "pinning"
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_column_pinning = Some(Rc::new(|table, updater| {
            table.mutate_column_pinning(updater)
        }));
        ops.is_some_columns_pinned = Some(Rc::new(|table, side| {
            table.read_state(|state| match side {
                Some(PinSide::Left) => !state.column_pinning.left.is_empty(),
                Some(PinSide::Right) => !state.column_pinning.right.is_empty(),
                None => {
                    !state.column_pinning.left.is_empty()
                        || !state.column_pinning.right.is_empty()
                }
            })
        }));
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.pin = Some(Rc::new(|table, column, side| {
            if !can_pin_column(table, column) {
                return;
            }
            let leaf_ids = column.leaf_ids();
            table.mutate_column_pinning(Updater::Apply(Rc::new(
                move |mut old: ColumnPinningState| {
                    old.left.retain(|id| !leaf_ids.contains(id));
                    old.right.retain(|id| !leaf_ids.contains(id));
                    match side {
                        Some(PinSide::Left) => old.left.extend(leaf_ids.iter().cloned()),
                        Some(PinSide::Right) => old.right.extend(leaf_ids.iter().cloned()),
                        None => {}
                    }
                    old
                },
            )));
        }));
        ops.is_pinned = Some(Rc::new(|table, column| pinned_side(table, column)));
        ops.pinned_index = Some(Rc::new(|table, column| {
            let side = pinned_side(table, column)?;
            let first_leaf = column.leaf_ids().into_iter().next()?;
            table.read_state(|state| {
                let list = match side {
                    PinSide::Left => &state.column_pinning.left,
                    PinSide::Right => &state.column_pinning.right,
                };
                list.iter().position(|id| *id == first_leaf)
            })
        }));
        ops.can_pin = Some(Rc::new(|table, column| can_pin_column(table, column)));
    }

    fn row_ops(&self, ops: &mut RowOps<T>) {
        ops.left_visible_cells = Some(Rc::new(|table, row| {
            cells_for(table, row, table.left_visible_leaf_columns())
        }));
        ops.center_visible_cells = Some(Rc::new(|table, row| {
            cells_for(table, row, table.center_visible_leaf_columns())
        }));
        ops.right_visible_cells = Some(Rc::new(|table, row| {
            cells_for(table, row, table.right_visible_leaf_columns())
        }));
    }
}

fn cells_for<'t, T: RowData>(
    table: &'t Table<T>,
    row: &Rc<Row<T>>,
    columns: Vec<Rc<Column<T>>>,
) -> Vec<CellRef<'t, T>> {
    columns
        .into_iter()
        .map(|column| CellRef {
            table,
            row: row.clone(),
            column,
        })
        .collect()
}

fn can_pin_column<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) -> bool {
    column.def.enable_pinning && table.options().enable_pinning
}

/// A column counts as pinned when any of its leaves is; mixed-side groups
/// report the side of the first pinned leaf.
fn pinned_side<T: RowData>(table: &Table<T>, column: &Rc<Column<T>>) -> Option<PinSide> {
    let leaf_ids = column.leaf_ids();
    table.read_state(|state| {
        for id in &leaf_ids {
            if state.column_pinning.left.contains(id) {
                return Some(PinSide::Left);
            }
            if state.column_pinning.right.contains(id) {
                return Some(PinSide::Right);
            }
        }
        None
    })
}
