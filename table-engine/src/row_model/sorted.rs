//! FILENAME: table-engine/src/row_model/sorted.rs
//! PURPOSE: Sorted stage - stable multi-key sort over the filtered model.
//! CONTEXT: Comparators evaluate in sort-list order, short-circuiting at the
//! first non-equal result. Sub-rows sort independently within each parent and
//! are never merged across siblings. A level whose order does not change keeps
//! its shared row instances.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::column::{Column, RowData, SortingFn};
use crate::error::TableError;
use crate::features::sorting;
use crate::row::{Row, RowModel};
use crate::state::ColumnSort;
use crate::table::Table;

struct ResolvedSort<T> {
    column: Rc<Column<T>>,
    descending: bool,
    comparator: SortingFn,
}

pub(crate) fn sort_rows<T: RowData>(
    table: &Table<T>,
    input: &Rc<RowModel<T>>,
    sorting: &[ColumnSort],
) -> Result<Rc<RowModel<T>>, TableError> {
    if !table.options().enable_sorting {
        return Ok(input.clone());
    }
    let keys = resolve_sorting(table, sorting)?;
    if keys.is_empty() {
        return Ok(input.clone());
    }
    let rows = sort_level(&input.rows, &keys);
    Ok(Rc::new(RowModel::from_rows(rows)))
}

fn resolve_sorting<T: RowData>(
    table: &Table<T>,
    sorting: &[ColumnSort],
) -> Result<SmallVec<[ResolvedSort<T>; 3]>, TableError> {
    let mut keys = SmallVec::new();
    for entry in sorting {
        let column = table
            .column_by_id(&entry.id)
            .ok_or_else(|| TableError::UnknownColumn(entry.id.clone()))?;
        if !column.def.enable_sorting {
            continue;
        }
        let comparator = sorting::resolve_sorting_fn(table, &column)?;
        keys.push(ResolvedSort {
            column,
            descending: entry.direction.is_descending(),
            comparator,
        });
    }
    Ok(keys)
}

fn sort_level<T: RowData>(rows: &[Rc<Row<T>>], keys: &[ResolvedSort<T>]) -> Vec<Rc<Row<T>>> {
    let mut sorted: Vec<Rc<Row<T>>> = rows.to_vec();
    // Vec::sort_by is stable: equal rows keep their input order
    sorted.sort_by(|a, b| compare_rows(a, b, keys));

    sorted
        .into_iter()
        .map(|row| {
            if row.sub_rows.is_empty() {
                return row;
            }
            let sub_rows = sort_level(&row.sub_rows, keys);
            if sub_rows
                .iter()
                .zip(&row.sub_rows)
                .all(|(a, b)| Rc::ptr_eq(a, b))
            {
                row
            } else {
                Rc::new(row.with_sub_rows(sub_rows))
            }
        })
        .collect()
}

fn compare_rows<T: RowData>(a: &Rc<Row<T>>, b: &Rc<Row<T>>, keys: &[ResolvedSort<T>]) -> Ordering {
    for key in keys {
        let ordering = (key.comparator)(&a.value(&key.column), &b.value(&key.column));
        let ordering = if key.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
