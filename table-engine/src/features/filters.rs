//! FILENAME: table-engine/src/features/filters.rs
//! PURPOSE: Column and global filtering feature.
//! CONTEXT: Installs the built-in filter predicates, contributes the filter
//! mutation/read operations, and resolves a column's `FnRef` into a concrete
//! predicate for the filtered stage. Predicate semantics: `(value,
//! filter_value) -> bool`, where an empty filter value never reaches the
//! predicate (it is a logical no-op dropped from state).

use std::rc::Rc;

use crate::column::{Column, FilterFn, FnRef, RowData};
use crate::error::TableError;
use crate::feature::{ColumnOps, TableFeature, TableOps};
use crate::state::{ColumnFilter, FilterCombinator, FilterValue, Updater};
use crate::table::{Table, TableOptions};
use crate::value::TableValue;

pub struct FiltersFeature;

impl<T: RowData> TableFeature<T> for FiltersFeature {
    fn name(&self) -> &'static str {
        "filters"
    }

    fn init_options(&self, options: &mut TableOptions<T>) {
        let builtins: [(&str, FilterFn); 4] = [
            ("equals", Rc::new(equals)),
            ("includes_string", Rc::new(includes_string)),
            ("in_number_range", Rc::new(in_number_range)),
            ("one_of", Rc::new(one_of)),
        ];
        for (name, predicate) in builtins {
            options
                .filter_fns
                .entry(name.to_string())
                .or_insert(predicate);
        }
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_column_filter = Some(Rc::new(|table, (id, value)| {
            set_column_filter(table, &id, value)
        }));
        ops.set_global_filter = Some(Rc::new(|table, value| {
            table.mutate_global_filter(Updater::Set(value.filter(|v| !v.is_empty())));
        }));
        ops.reset_column_filters = Some(Rc::new(|table| {
            table.mutate_column_filters(Updater::Set(Vec::new()));
        }));
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.filter_value = Some(Rc::new(|table, column| {
            table.read_state(|state| {
                state
                    .column_filters
                    .iter()
                    .find(|f| f.id == column.id)
                    .map(|f| f.value.clone())
            })
        }));
        ops.set_filter_value = Some(Rc::new(|table, column, value| {
            set_column_filter(table, &column.id, value)
        }));
        ops.can_filter = Some(Rc::new(|table, column| {
            column.def.enable_filtering
                && column.def.accessor.is_some()
                && table.options().enable_filters
        }));
    }
}

/// Replaces the column's filter entry; an empty value removes it.
fn set_column_filter<T: RowData>(table: &Table<T>, column_id: &str, value: FilterValue) {
    let column_id = column_id.to_string();
    table.mutate_column_filters(Updater::Apply(Rc::new(move |mut old| {
        old.retain(|f: &ColumnFilter| f.id != column_id);
        if !value.is_empty() {
            old.push(ColumnFilter {
                id: column_id.clone(),
                value: value.clone(),
                combinator: FilterCombinator::And,
            });
        }
        old
    })));
}

// ============================================================================
// PREDICATE RESOLUTION
// ============================================================================

/// Resolves a column's filter predicate: explicit closure, named lookup
/// (unknown name fails on first use), or a default picked from the shape of
/// the filter value.
pub(crate) fn resolve_filter_fn<T: RowData>(
    table: &Table<T>,
    column: &Rc<Column<T>>,
    value: &FilterValue,
) -> Result<FilterFn, TableError> {
    match &column.def.filter_fn {
        FnRef::Custom(f) => Ok(f.clone()),
        FnRef::Named(name) => table
            .options()
            .filter_fns
            .get(name)
            .cloned()
            .ok_or_else(|| TableError::UnknownFilterFn {
                column: column.id.clone(),
                name: name.clone(),
            }),
        FnRef::Auto => Ok(auto_filter_fn(value)),
    }
}

/// The table-level global filter predicate; defaults to substring matching.
pub(crate) fn resolve_global_filter_fn<T: RowData>(
    table: &Table<T>,
) -> Result<FilterFn, TableError> {
    match &table.options().global_filter_fn {
        FnRef::Custom(f) => Ok(f.clone()),
        FnRef::Named(name) => table
            .options()
            .filter_fns
            .get(name)
            .cloned()
            .ok_or_else(|| TableError::UnknownFilterFn {
                column: "<global>".to_string(),
                name: name.clone(),
            }),
        FnRef::Auto => Ok(Rc::new(includes_string)),
    }
}

fn auto_filter_fn(value: &FilterValue) -> FilterFn {
    match value {
        FilterValue::Range { .. } => Rc::new(in_number_range),
        FilterValue::Set(_) => Rc::new(one_of),
        FilterValue::Value(TableValue::Text(_)) => Rc::new(includes_string),
        FilterValue::Value(_) => Rc::new(equals),
    }
}

// ============================================================================
// BUILT-IN PREDICATES
// ============================================================================

/// Equality with numeric values compared across Int/Float variants.
fn loose_eq(a: &TableValue, b: &TableValue) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn equals(value: &TableValue, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Value(expected) => loose_eq(value, expected),
        _ => false,
    }
}

fn includes_string(value: &TableValue, filter: &FilterValue) -> bool {
    let FilterValue::Value(TableValue::Text(needle)) = filter else {
        return false;
    };
    value
        .to_string()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Inclusive on both bounds; a missing bound is unbounded. Non-numeric values
/// never pass an active range.
fn in_number_range(value: &TableValue, filter: &FilterValue) -> bool {
    let FilterValue::Range { min, max } = filter else {
        return false;
    };
    let Some(n) = value.as_number() else {
        return false;
    };
    if let Some(min) = min {
        if n < *min {
            return false;
        }
    }
    if let Some(max) = max {
        if n > *max {
            return false;
        }
    }
    true
}

fn one_of(value: &TableValue, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Set(allowed) => allowed.iter().any(|v| loose_eq(value, v)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_number_range() {
        let range = FilterValue::Range {
            min: Some(18.0),
            max: Some(100.0),
        };
        assert!(in_number_range(&TableValue::Int(25), &range));
        assert!(in_number_range(&TableValue::Int(18), &range));
        assert!(!in_number_range(&TableValue::Int(17), &range));
        assert!(!in_number_range(&TableValue::from("25"), &range));
        assert!(!in_number_range(&TableValue::Null, &range));

        let open = FilterValue::Range {
            min: None,
            max: Some(10.0),
        };
        assert!(in_number_range(&TableValue::Int(-100), &open));
    }

    #[test]
    fn test_includes_string_is_case_insensitive() {
        let filter = FilterValue::Value(TableValue::from("aLi"));
        assert!(includes_string(&TableValue::from("Alice"), &filter));
        assert!(!includes_string(&TableValue::from("Bob"), &filter));
        // Non-text values match on their display form
        assert!(includes_string(
            &TableValue::Int(425),
            &FilterValue::Value(TableValue::from("42"))
        ));
    }

    #[test]
    fn test_equals_compares_numbers_across_variants() {
        assert!(equals(
            &TableValue::Int(25),
            &FilterValue::Value(TableValue::from(25.0))
        ));
        assert!(!equals(
            &TableValue::Int(25),
            &FilterValue::Value(TableValue::from("25"))
        ));
    }

    #[test]
    fn test_one_of() {
        let filter = FilterValue::Set(vec![TableValue::from("a"), TableValue::Int(2)]);
        assert!(one_of(&TableValue::from("a"), &filter));
        assert!(one_of(&TableValue::from(2.0), &filter));
        assert!(!one_of(&TableValue::from("b"), &filter));
    }
}
