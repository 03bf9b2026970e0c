//! FILENAME: table-engine/src/row_model/core.rs
//! PURPOSE: Core stage - builds the initial row tree from raw data.

use std::rc::Rc;

use crate::column::RowData;
use crate::error::TableError;
use crate::row::{Row, RowModel};
use crate::state::RowId;
use crate::table::Table;

/// Builds rows in source order, recursing into configured sub-rows. Row ids
/// come from the host's `get_row_id` callback or default to the dotted index
/// path; a collision is a configuration error.
pub(crate) fn build_core_row_model<T: RowData>(
    table: &Table<T>,
) -> Result<Rc<RowModel<T>>, TableError> {
    let data = table.options().data.clone();
    let mut rows = Vec::with_capacity(data.len());
    for (index, item) in data.iter().enumerate() {
        rows.push(build_row(table, item, index, 0, None));
    }
    Ok(Rc::new(RowModel::from_rows_checked(rows)?))
}

fn build_row<T: RowData>(
    table: &Table<T>,
    item: &T,
    index: usize,
    depth: usize,
    parent_id: Option<&RowId>,
) -> Rc<Row<T>> {
    let options = table.options();
    let id = match &options.get_row_id {
        Some(get_row_id) => get_row_id(item, index, parent_id.map(|p| p.as_str())),
        None => match parent_id {
            Some(parent) => format!("{}.{}", parent, index),
            None => index.to_string(),
        },
    };

    let mut row = Row::new(
        id.clone(),
        index,
        depth,
        parent_id.cloned(),
        Rc::new(item.clone()),
    );
    if let Some(get_sub_rows) = &options.get_sub_rows {
        let children = get_sub_rows(item);
        let mut sub_rows = Vec::with_capacity(children.len());
        for (sub_index, child) in children.iter().enumerate() {
            sub_rows.push(build_row(table, child, sub_index, depth + 1, Some(&id)));
        }
        row.sub_rows = sub_rows;
    }
    Rc::new(row)
}
