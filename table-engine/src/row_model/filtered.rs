//! FILENAME: table-engine/src/row_model/filtered.rs
//! PURPOSE: Filtered stage - applies active column filters and the global filter.
//! CONTEXT: Filters compose conjunctively across columns; a filter may opt into
//! the OR combinator instead, in which case at least one OR filter must pass.
//! A row failing the composition is excluded together with all its
//! descendants; a passing row keeps its identity and has its sub-rows filtered
//! recursively. Relative order is preserved.

use std::rc::Rc;

use crate::column::{Column, FilterFn, RowData};
use crate::error::TableError;
use crate::features::filters;
use crate::row::{Row, RowModel};
use crate::state::{ColumnFilter, FilterCombinator, FilterValue};
use crate::table::Table;

pub(crate) fn filter_rows<T: RowData>(
    table: &Table<T>,
    input: &Rc<RowModel<T>>,
    column_filters: &[ColumnFilter],
    global_filter: Option<&FilterValue>,
) -> Result<Rc<RowModel<T>>, TableError> {
    if !table.options().enable_filters {
        return Ok(input.clone());
    }
    let resolved = resolve_filters(table, column_filters)?;
    let global = resolve_global(table, global_filter)?;
    if resolved.is_empty() && global.is_none() {
        // No active filter: every row passes
        return Ok(input.clone());
    }

    let rows = filter_level(&input.rows, &resolved, global.as_ref());
    Ok(Rc::new(RowModel::from_rows(rows)))
}

struct ResolvedFilter<T> {
    column: Rc<Column<T>>,
    value: FilterValue,
    predicate: FilterFn,
    combinator: FilterCombinator,
}

struct GlobalFilter<T> {
    columns: Vec<Rc<Column<T>>>,
    value: FilterValue,
    predicate: FilterFn,
}

fn resolve_filters<T: RowData>(
    table: &Table<T>,
    column_filters: &[ColumnFilter],
) -> Result<Vec<ResolvedFilter<T>>, TableError> {
    let mut resolved = Vec::new();
    for filter in column_filters {
        if filter.value.is_empty() {
            continue;
        }
        let column = table
            .column_by_id(&filter.id)
            .ok_or_else(|| TableError::UnknownColumn(filter.id.clone()))?;
        if !column.def.enable_filtering {
            continue;
        }
        let predicate = filters::resolve_filter_fn(table, &column, &filter.value)?;
        resolved.push(ResolvedFilter {
            column,
            value: filter.value.clone(),
            predicate,
            combinator: filter.combinator,
        });
    }
    Ok(resolved)
}

fn resolve_global<T: RowData>(
    table: &Table<T>,
    global_filter: Option<&FilterValue>,
) -> Result<Option<GlobalFilter<T>>, TableError> {
    let Some(value) = global_filter else {
        return Ok(None);
    };
    if value.is_empty() {
        return Ok(None);
    }
    let columns: Vec<Rc<Column<T>>> = table
        .leaf_columns()
        .iter()
        .filter(|c| c.def.enable_global_filter && c.def.accessor.is_some())
        .cloned()
        .collect();
    let predicate = filters::resolve_global_filter_fn(table)?;
    Ok(Some(GlobalFilter {
        columns,
        value: value.clone(),
        predicate,
    }))
}

fn row_passes<T: RowData>(
    row: &Rc<Row<T>>,
    filters: &[ResolvedFilter<T>],
    global: Option<&GlobalFilter<T>>,
) -> bool {
    let mut any_or = false;
    let mut or_passed = false;
    for filter in filters {
        let value = row.value(&filter.column);
        let pass = (filter.predicate)(&value, &filter.value);
        match filter.combinator {
            FilterCombinator::And => {
                if !pass {
                    return false;
                }
            }
            FilterCombinator::Or => {
                any_or = true;
                or_passed |= pass;
            }
        }
    }
    if any_or && !or_passed {
        return false;
    }
    if let Some(global) = global {
        let hit = global
            .columns
            .iter()
            .any(|column| (global.predicate)(&row.value(column), &global.value));
        if !hit {
            return false;
        }
    }
    true
}

fn filter_level<T: RowData>(
    rows: &[Rc<Row<T>>],
    filters: &[ResolvedFilter<T>],
    global: Option<&GlobalFilter<T>>,
) -> Vec<Rc<Row<T>>> {
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if !row_passes(row, filters, global) {
            continue;
        }
        if row.sub_rows.is_empty() {
            kept.push(row.clone());
            continue;
        }
        let sub_rows = filter_level(&row.sub_rows, filters, global);
        if sub_rows.len() == row.sub_rows.len()
            && sub_rows
                .iter()
                .zip(&row.sub_rows)
                .all(|(a, b)| Rc::ptr_eq(a, b))
        {
            // Nothing below changed; keep the shared instance
            kept.push(row.clone());
        } else {
            kept.push(Rc::new(row.with_sub_rows(sub_rows)));
        }
    }
    kept
}
