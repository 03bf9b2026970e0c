//! FILENAME: table-engine/src/features/grouping.rs
//! PURPOSE: Grouping feature - aggregation table and grouping-state operations.
//! CONTEXT: Grouping buckets rows into synthetic parents, which are only
//! reachable through the expand stage, so grouping structurally requires the
//! expanding feature. Aggregators reduce the leaf values under a group row;
//! `Auto` picks sum for numeric columns and a distinct count otherwise.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::column::{AggregationFn, Column, FnRef, RowData};
use crate::error::TableError;
use crate::feature::{CellOps, ColumnOps, ComposedOps, TableFeature, TableOps};
use crate::state::{GroupingState, Updater};
use crate::table::{Table, TableOptions};
use crate::value::TableValue;

pub struct GroupingFeature;

impl<T: RowData> TableFeature<T> for GroupingFeature {
    fn name(&self) -> &'static str {
        "grouping"
    }

    fn init_options(&self, options: &mut TableOptions<T>) {
        let builtins: [(&str, AggregationFn); 6] = [
            ("sum", Rc::new(aggregate_sum)),
            ("min", Rc::new(aggregate_min)),
            ("max", Rc::new(aggregate_max)),
            ("mean", Rc::new(aggregate_mean)),
            ("count", Rc::new(|values| TableValue::Int(values.len() as i64))),
            ("unique_count", Rc::new(aggregate_unique_count)),
        ];
        for (name, aggregate) in builtins {
            options
                .aggregation_fns
                .entry(name.to_string())
                .or_insert(aggregate);
        }
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_grouping = Some(Rc::new(|table, updater| table.mutate_grouping(updater)));
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.toggle_grouping = Some(Rc::new(|table, column| {
            let id = column.id.clone();
            table.mutate_grouping(Updater::Apply(Rc::new(move |mut old: GroupingState| {
                if let Some(pos) = old.iter().position(|g| *g == id) {
                    old.remove(pos);
                } else {
                    old.push(id.clone());
                }
                old
            })));
        }));
        ops.is_grouped = Some(Rc::new(|table, column| {
            table.read_state(|state| state.grouping.contains(&column.id))
        }));
        ops.grouped_index = Some(Rc::new(|table, column| {
            table.read_state(|state| state.grouping.iter().position(|g| *g == column.id))
        }));
        ops.can_group = Some(Rc::new(|table, column| {
            column.def.enable_grouping && table.options().enable_grouping
        }));
    }

    fn cell_ops(&self, ops: &mut CellOps<T>) {
        // A cell is "grouped" when its row is the synthetic bucket for this
        // very column, "aggregated" when the row is a bucket for some other
        // column, and a "placeholder" when a leaf row shows a column that the
        // grouping already accounts for.
        ops.is_grouped = Some(Rc::new(|_table, row, column| {
            row.grouping_column.as_deref() == Some(column.id.as_str())
        }));
        ops.is_aggregated = Some(Rc::new(|_table, row, column| {
            row.is_grouped() && row.grouping_column.as_deref() != Some(column.id.as_str())
        }));
        ops.is_placeholder = Some(Rc::new(|table, row, column| {
            !row.is_grouped() && table.read_state(|state| state.grouping.contains(&column.id))
        }));
    }

    fn validate(&self, ops: &ComposedOps<T>) -> Result<(), TableError> {
        if ops.row.toggle_expanded.is_none() {
            return Err(TableError::MissingFeature {
                feature: "grouping",
                requires: "expanding",
            });
        }
        Ok(())
    }
}

// ============================================================================
// AGGREGATORS
// ============================================================================

pub(crate) fn resolve_aggregation_fn<T: RowData>(
    table: &Table<T>,
    column: &Rc<Column<T>>,
) -> Result<AggregationFn, TableError> {
    match &column.def.aggregation_fn {
        FnRef::Custom(f) => Ok(f.clone()),
        FnRef::Named(name) => table
            .options()
            .aggregation_fns
            .get(name)
            .cloned()
            .ok_or_else(|| TableError::UnknownAggregationFn {
                column: column.id.clone(),
                name: name.clone(),
            }),
        FnRef::Auto => Ok(Rc::new(auto_aggregate)),
    }
}

/// Sum when every non-null value is numeric, distinct count otherwise.
fn auto_aggregate(values: &[TableValue]) -> TableValue {
    let non_null: Vec<_> = values.iter().filter(|v| !v.is_null()).collect();
    if !non_null.is_empty() && non_null.iter().all(|v| v.as_number().is_some()) {
        aggregate_sum(values)
    } else {
        aggregate_unique_count(values)
    }
}

fn numeric(values: &[TableValue]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|v| v.as_number())
}

fn aggregate_sum(values: &[TableValue]) -> TableValue {
    TableValue::from(numeric(values).sum::<f64>())
}

fn aggregate_min(values: &[TableValue]) -> TableValue {
    numeric(values)
        .fold(None, |acc: Option<f64>, n| {
            Some(acc.map_or(n, |m| m.min(n)))
        })
        .map_or(TableValue::Null, TableValue::from)
}

fn aggregate_max(values: &[TableValue]) -> TableValue {
    numeric(values)
        .fold(None, |acc: Option<f64>, n| {
            Some(acc.map_or(n, |m| m.max(n)))
        })
        .map_or(TableValue::Null, TableValue::from)
}

fn aggregate_mean(values: &[TableValue]) -> TableValue {
    let (count, sum) = numeric(values).fold((0usize, 0.0), |(c, s), n| (c + 1, s + n));
    if count == 0 {
        TableValue::Null
    } else {
        TableValue::from(sum / count as f64)
    }
}

fn aggregate_unique_count(values: &[TableValue]) -> TableValue {
    let distinct: FxHashSet<&TableValue> = values.iter().filter(|v| !v.is_null()).collect();
    TableValue::Int(distinct.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_ignores_non_numeric() {
        let values = vec![
            TableValue::Int(2),
            TableValue::from("x"),
            TableValue::from(3.5),
            TableValue::Null,
        ];
        assert_eq!(aggregate_sum(&values), TableValue::from(5.5));
    }

    #[test]
    fn test_mean_of_empty_is_null() {
        assert_eq!(aggregate_mean(&[]), TableValue::Null);
        assert_eq!(aggregate_mean(&[TableValue::from("x")]), TableValue::Null);
    }

    #[test]
    fn test_min_max() {
        let values = vec![TableValue::Int(4), TableValue::from(-1.5), TableValue::Int(9)];
        assert_eq!(aggregate_min(&values), TableValue::from(-1.5));
        assert_eq!(aggregate_max(&values), TableValue::from(9.0));
    }

    #[test]
    fn test_auto_aggregate_dispatch() {
        let numbers = vec![TableValue::Int(1), TableValue::Int(2)];
        assert_eq!(auto_aggregate(&numbers), TableValue::from(3.0));

        let mixed = vec![
            TableValue::from("a"),
            TableValue::from("b"),
            TableValue::from("a"),
        ];
        assert_eq!(auto_aggregate(&mixed), TableValue::Int(2));
    }

    #[test]
    fn test_unique_count_skips_nulls() {
        let values = vec![TableValue::Null, TableValue::Int(1), TableValue::Int(1)];
        assert_eq!(aggregate_unique_count(&values), TableValue::Int(1));
    }
}
