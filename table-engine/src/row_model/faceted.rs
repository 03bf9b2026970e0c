//! FILENAME: table-engine/src/row_model/faceted.rs
//! PURPOSE: Faceted side-branch - per-column aggregates for filter affordances.
//! CONTEXT: Faceting for a column runs over the core model filtered by every
//! OTHER column's filter (self-exclusion: a column's own filter must not
//! narrow its own facet values). Results are memoized per column id and
//! invalidated when the facet input model changes.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::column::RowData;
use crate::error::TableError;
use crate::row::RowModel;
use crate::row_model::filtered;
use crate::table::Table;
use crate::value::TableValue;

pub(crate) fn faceted_row_model<T: RowData>(
    table: &Table<T>,
    column_id: &str,
) -> Result<Rc<RowModel<T>>, TableError> {
    table
        .column_by_id(column_id)
        .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))?;
    let core = table.core_row_model()?;
    let (filters, global) = table.read_state(|state| {
        let filters: Vec<_> = state
            .column_filters
            .iter()
            .filter(|f| f.id != column_id)
            .cloned()
            .collect();
        (filters, state.global_filter.clone())
    });

    let cache = table.facet_cache(column_id);
    cache.row_model.try_get_or_insert_with(
        (core.clone(), filters.clone(), global.clone()),
        || filtered::filter_rows(table, &core, &filters, global.as_ref()),
    )
}

/// Unique value -> occurrence count over the facet input's source rows, in
/// first-occurrence order. A column without an accessor has no materialized
/// map and yields an empty mapping.
pub(crate) fn faceted_unique_values<T: RowData>(
    table: &Table<T>,
    column_id: &str,
) -> Result<Rc<Vec<(TableValue, usize)>>, TableError> {
    let column = table
        .column_by_id(column_id)
        .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))?;
    let model = faceted_row_model(table, column_id)?;

    let cache = table.facet_cache(column_id);
    cache.unique_values.try_get_or_insert_with((model.clone(),), || {
        if column.def.accessor.is_none() {
            return Ok(Rc::new(Vec::new()));
        }
        let mut counts: Vec<(TableValue, usize)> = Vec::new();
        let mut index: FxHashMap<TableValue, usize> = FxHashMap::default();
        for row in &model.flat_rows {
            if row.original.is_none() {
                continue;
            }
            let value = row.value(&column);
            match index.get(&value) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(value.clone(), counts.len());
                    counts.push((value, 1));
                }
            }
        }
        Ok(Rc::new(counts))
    })
}

/// Numeric `[min, max]` over the facet input, `None` when the column has no
/// numeric values in it.
pub(crate) fn faceted_min_max<T: RowData>(
    table: &Table<T>,
    column_id: &str,
) -> Result<Option<(f64, f64)>, TableError> {
    let column = table
        .column_by_id(column_id)
        .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))?;
    let model = faceted_row_model(table, column_id)?;

    let cache = table.facet_cache(column_id);
    cache.min_max.try_get_or_insert_with((model.clone(),), || {
        let mut bounds: Option<(f64, f64)> = None;
        for row in &model.flat_rows {
            if row.original.is_none() {
                continue;
            }
            if let Some(n) = row.value(&column).as_number() {
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(n), max.max(n)),
                    None => (n, n),
                });
            }
        }
        Ok(bounds)
    })
}
