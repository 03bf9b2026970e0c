//! FILENAME: table-engine/src/row_model/grouped.rs
//! PURPOSE: Grouped stage - buckets rows under synthetic group rows.
//! CONTEXT: For each grouping column id in order, the current level's rows are
//! partitioned by accessor value in first-occurrence order. Each bucket becomes
//! one synthetic row owning its members as sub-rows, recursively grouped by the
//! remaining ids, and carrying per-column aggregates over the bucket's leaves.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::column::{Column, RowData};
use crate::error::TableError;
use crate::features::grouping;
use crate::row::{Row, RowModel};
use crate::state::{ColumnId, RowId};
use crate::table::Table;
use crate::value::TableValue;

pub(crate) fn group_rows<T: RowData>(
    table: &Table<T>,
    input: &Rc<RowModel<T>>,
    grouping: &[ColumnId],
) -> Result<Rc<RowModel<T>>, TableError> {
    if grouping.is_empty() || !table.options().enable_grouping {
        return Ok(input.clone());
    }
    let mut columns = Vec::with_capacity(grouping.len());
    for id in grouping {
        let column = table
            .column_by_id(id)
            .ok_or_else(|| TableError::UnknownColumn(id.clone()))?;
        if column.def.enable_grouping {
            columns.push(column);
        }
    }
    if columns.is_empty() {
        return Ok(input.clone());
    }
    let rows = group_level(table, &input.rows, &columns, 0, None)?;
    Ok(Rc::new(RowModel::from_rows(rows)))
}

fn group_level<T: RowData>(
    table: &Table<T>,
    rows: &[Rc<Row<T>>],
    columns: &[Rc<Column<T>>],
    depth: usize,
    parent_id: Option<&RowId>,
) -> Result<Vec<Rc<Row<T>>>, TableError> {
    let Some((column, rest)) = columns.split_first() else {
        return Ok(rows.to_vec());
    };

    // Bucket by value, preserving first-occurrence order
    let mut order: Vec<TableValue> = Vec::new();
    let mut buckets: FxHashMap<TableValue, Vec<Rc<Row<T>>>> = FxHashMap::default();
    for row in rows {
        let key = row.value(column);
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(row.clone());
    }

    let mut grouped = Vec::with_capacity(order.len());
    for (index, key) in order.into_iter().enumerate() {
        let members = buckets.remove(&key).unwrap_or_default();
        let key_text = group_key_text(&key);
        let id = match parent_id {
            Some(parent) => format!("{}.{}:{}", parent, column.id, key_text),
            None => format!("{}:{}", column.id, key_text),
        };

        let leaves: Vec<Rc<Row<T>>> = members.iter().flat_map(|row| row.leaf_rows()).collect();
        let aggregates = compute_aggregates(table, column, &leaves)?;
        let sub_rows = group_level(table, &members, rest, depth + 1, Some(&id))?;

        grouped.push(Rc::new(Row::grouped(
            id,
            index,
            depth,
            parent_id.cloned(),
            column.id.clone(),
            key,
            aggregates,
            sub_rows,
        )));
    }
    Ok(grouped)
}

/// Renders a bucket key for a synthetic row id. The variant prefix keeps ids
/// distinct when different variants share a display form, such as `Int(1)` and
/// `Float(1.0)`, or `Null` and `Text("")`.
fn group_key_text(key: &TableValue) -> String {
    match key {
        TableValue::Null => "null".to_string(),
        TableValue::Bool(b) => format!("b={}", b),
        TableValue::Int(n) => format!("i={}", n),
        TableValue::Float(f) => format!("f={}", f.0),
        TableValue::Text(s) => format!("t={}", s),
        TableValue::DateTime(dt) => format!("d={}", dt),
    }
}

fn compute_aggregates<T: RowData>(
    table: &Table<T>,
    grouping_column: &Rc<Column<T>>,
    leaves: &[Rc<Row<T>>],
) -> Result<FxHashMap<ColumnId, TableValue>, TableError> {
    let mut aggregates = FxHashMap::default();
    for column in table.leaf_columns() {
        if column.id == grouping_column.id || column.def.accessor.is_none() {
            continue;
        }
        let aggregate = grouping::resolve_aggregation_fn(table, column)?;
        let values: Vec<TableValue> = leaves.iter().map(|row| row.value(column)).collect();
        aggregates.insert(column.id.clone(), aggregate(&values));
    }
    Ok(aggregates)
}
