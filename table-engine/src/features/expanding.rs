//! FILENAME: table-engine/src/features/expanding.rs
//! PURPOSE: Expanding feature - hierarchical row expand/collapse state.
//! CONTEXT: Expansion state is either the distinguished "all expanded" value
//! or an explicit set of row ids. Toggling a row while in the "all" state
//! first materializes the set of every currently-expandable row id, then
//! removes the toggled one.

use std::rc::Rc;

use crate::column::RowData;
use crate::error::TableError;
use crate::feature::{RowOps, TableFeature, TableOps};
use crate::row::Row;
use crate::state::{ExpandedState, Updater};
use crate::table::Table;

pub struct ExpandingFeature;

impl<T: RowData> TableFeature<T> for ExpandingFeature {
    fn name(&self) -> &'static str {
        "expanding"
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_expanded = Some(Rc::new(|table, updater| table.mutate_expanded(updater)));
        ops.toggle_all_rows_expanded = Some(Rc::new(|table| {
            let all = table.read_state(|state| matches!(state.expanded, ExpandedState::All));
            let next = if all {
                ExpandedState::default()
            } else {
                ExpandedState::All
            };
            table.mutate_expanded(Updater::Set(next));
        }));
        ops.is_all_rows_expanded = Some(Rc::new(|table| {
            table.read_state(|state| matches!(state.expanded, ExpandedState::All))
        }));
    }

    fn row_ops(&self, ops: &mut RowOps<T>) {
        ops.toggle_expanded = Some(Rc::new(|table, row, forced| {
            toggle_row_expanded(table, row, forced)
        }));
        ops.is_expanded = Some(Rc::new(|table, row| {
            table.read_state(|state| state.expanded.is_expanded(&row.id))
        }));
        ops.can_expand = Some(Rc::new(|table, row| {
            table.options().enable_expanding && !row.sub_rows.is_empty()
        }));
    }
}

fn toggle_row_expanded<T: RowData>(
    table: &Table<T>,
    row: &Rc<Row<T>>,
    forced: Option<bool>,
) -> Result<(), TableError> {
    let id = row.id.clone();
    // Grouped model, so synthetic group rows are toggleable too.
    let expandable_ids: Vec<_> = table
        .grouped_row_model()?
        .flat_rows
        .iter()
        .filter(|r| !r.sub_rows.is_empty())
        .map(|r| r.id.clone())
        .collect();
    table.mutate_expanded(Updater::Apply(Rc::new(move |old: ExpandedState| {
        let mut set = match old {
            ExpandedState::All => expandable_ids.iter().cloned().collect(),
            ExpandedState::Rows(set) => set,
        };
        let expand = forced.unwrap_or_else(|| !set.contains(&id));
        if expand {
            set.insert(id.clone());
        } else {
            set.remove(&id);
        }
        ExpandedState::Rows(set)
    })));
    Ok(())
}
