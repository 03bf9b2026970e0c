//! FILENAME: table-engine/src/row_model/expanded.rs
//! PURPOSE: Expanded stage - inlines expanded sub-rows into the top-level list.

use std::rc::Rc;

use crate::column::RowData;
use crate::row::{Row, RowModel};
use crate::state::ExpandedState;
use crate::table::Table;

/// Every top-level row appears; an expanded row's sub-rows follow it
/// depth-first. `flat_rows` and `rows_by_id` carry over unchanged because the
/// stage neither adds nor removes rows.
pub(crate) fn expand_rows<T: RowData>(
    table: &Table<T>,
    input: &Rc<RowModel<T>>,
    expanded: &ExpandedState,
) -> Rc<RowModel<T>> {
    if !table.options().enable_expanding || expanded.is_empty() {
        return input.clone();
    }
    if input.rows.iter().all(|row| row.sub_rows.is_empty()) {
        return input.clone();
    }

    let mut rows = Vec::with_capacity(input.rows.len());
    for row in &input.rows {
        push_expanded(row, expanded, &mut rows);
    }
    Rc::new(RowModel {
        rows,
        flat_rows: input.flat_rows.clone(),
        rows_by_id: input.rows_by_id.clone(),
    })
}

fn push_expanded<T>(row: &Rc<Row<T>>, expanded: &ExpandedState, out: &mut Vec<Rc<Row<T>>>) {
    out.push(row.clone());
    if expanded.is_expanded(&row.id) {
        for sub in &row.sub_rows {
            push_expanded(sub, expanded, out);
        }
    }
}
