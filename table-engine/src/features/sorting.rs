//! FILENAME: table-engine/src/features/sorting.rs
//! PURPOSE: Sorting feature - comparator table and sort-state operations.
//! CONTEXT: Comparators work on resolved values. `Auto` dispatches on the
//! value types at hand (numeric, case-insensitive text, datetime) and falls
//! back to the total order on `TableValue`, which places Null first. Unknown
//! named comparators fail on the first sort attempt, never silently.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::column::{Column, FnRef, RowData, SortingFn};
use crate::error::TableError;
use crate::feature::{ColumnOps, TableFeature, TableOps};
use crate::state::{ColumnSort, SortDirection, SortingState, Updater};
use crate::table::{Table, TableOptions};
use crate::value::TableValue;

pub struct SortingFeature;

impl<T: RowData> TableFeature<T> for SortingFeature {
    fn name(&self) -> &'static str {
        "sorting"
    }

    fn init_options(&self, options: &mut TableOptions<T>) {
        let builtins: [(&str, SortingFn); 4] = [
            ("numeric", Rc::new(compare_numeric)),
            ("text", Rc::new(compare_text)),
            ("datetime", Rc::new(compare_datetime)),
            ("basic", Rc::new(|a, b| a.cmp(b))),
        ];
        for (name, comparator) in builtins {
            options
                .sorting_fns
                .entry(name.to_string())
                .or_insert(comparator);
        }
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_sorting = Some(Rc::new(|table, updater| table.mutate_sorting(updater)));
        ops.reset_sorting = Some(Rc::new(|table| {
            table.mutate_sorting(Updater::Set(Vec::new()));
        }));
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.toggle_sorting = Some(Rc::new(|table, column, (direction, multi)| {
            toggle_column_sorting(table, column, direction, multi)
        }));
        ops.clear_sorting = Some(Rc::new(|table, column| {
            let id = column.id.clone();
            table.mutate_sorting(Updater::Apply(Rc::new(move |mut old: SortingState| {
                old.retain(|s| s.id != id);
                old
            })));
        }));
        ops.sort_direction = Some(Rc::new(|table, column| {
            table.read_state(|state| {
                state
                    .sorting
                    .iter()
                    .find(|s| s.id == column.id)
                    .map(|s| s.direction)
            })
        }));
        ops.sort_index = Some(Rc::new(|table, column| {
            table.read_state(|state| state.sorting.iter().position(|s| s.id == column.id))
        }));
        ops.can_sort = Some(Rc::new(|table, column| {
            column.def.enable_sorting && table.options().enable_sorting
        }));
    }
}

/// Cycles ascending -> descending -> unsorted unless a direction is forced.
/// Single-sort replaces the whole list; multi-sort edits this column's entry
/// in place (or appends it) and keeps the rest.
fn toggle_column_sorting<T: RowData>(
    table: &Table<T>,
    column: &Rc<Column<T>>,
    direction: Option<SortDirection>,
    multi: bool,
) {
    let id = column.id.clone();
    table.mutate_sorting(Updater::Apply(Rc::new(move |old: SortingState| {
        let current = old.iter().find(|s| s.id == id).map(|s| s.direction);
        let next = match direction {
            Some(forced) => Some(forced),
            None => match current {
                None => Some(SortDirection::Ascending),
                Some(SortDirection::Ascending) => Some(SortDirection::Descending),
                Some(SortDirection::Descending) => None,
            },
        };

        if !multi {
            return match next {
                Some(direction) => vec![ColumnSort {
                    id: id.clone(),
                    direction,
                }],
                None => Vec::new(),
            };
        }

        let mut sorting = old;
        match next {
            None => sorting.retain(|s| s.id != id),
            Some(direction) => {
                if let Some(entry) = sorting.iter_mut().find(|s| s.id == id) {
                    entry.direction = direction;
                } else {
                    sorting.push(ColumnSort {
                        id: id.clone(),
                        direction,
                    });
                }
            }
        }
        sorting
    })));
}

// ============================================================================
// COMPARATORS
// ============================================================================

/// Resolves a column's comparator: explicit closure, named lookup, or the
/// value-type default.
pub(crate) fn resolve_sorting_fn<T: RowData>(
    table: &Table<T>,
    column: &Rc<Column<T>>,
) -> Result<SortingFn, TableError> {
    match &column.def.sorting_fn {
        FnRef::Custom(f) => Ok(f.clone()),
        FnRef::Named(name) => table
            .options()
            .sorting_fns
            .get(name)
            .cloned()
            .ok_or_else(|| TableError::UnknownSortingFn {
                column: column.id.clone(),
                name: name.clone(),
            }),
        FnRef::Auto => Ok(Rc::new(auto_compare)),
    }
}

fn auto_compare(a: &TableValue, b: &TableValue) -> Ordering {
    match (a, b) {
        (TableValue::Text(x), TableValue::Text(y)) => compare_text_raw(x, y),
        (TableValue::DateTime(x), TableValue::DateTime(y)) => x.cmp(y),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(b),
        },
    }
}

fn compare_numeric(a: &TableValue, b: &TableValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        // Non-numeric (including Null) sorts before numeric
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Case-insensitive comparison with a case-sensitive tiebreak, an
/// approximation of locale-aware collation that stays deterministic.
fn compare_text_raw(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_text(a: &TableValue, b: &TableValue) -> Ordering {
    match (a, b) {
        (TableValue::Text(x), TableValue::Text(y)) => compare_text_raw(x, y),
        _ => a.cmp(b),
    }
}

fn compare_datetime(a: &TableValue, b: &TableValue) -> Ordering {
    match (a, b) {
        (TableValue::DateTime(x), TableValue::DateTime(y)) => x.cmp(y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_compare_numbers_across_variants() {
        assert_eq!(
            auto_compare(&TableValue::Int(2), &TableValue::from(10.0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_auto_compare_text_case_insensitive() {
        assert_eq!(
            auto_compare(&TableValue::from("apple"), &TableValue::from("Banana")),
            Ordering::Less
        );
        // Equal ignoring case falls back to a case-sensitive tiebreak
        assert_eq!(
            auto_compare(&TableValue::from("Apple"), &TableValue::from("apple")),
            Ordering::Less
        );
    }

    #[test]
    fn test_null_sorts_before_values() {
        assert_eq!(
            auto_compare(&TableValue::Null, &TableValue::Int(0)),
            Ordering::Less
        );
        assert_eq!(
            compare_numeric(&TableValue::Null, &TableValue::Int(-5)),
            Ordering::Less
        );
    }
}
