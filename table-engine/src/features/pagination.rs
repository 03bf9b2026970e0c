//! FILENAME: table-engine/src/features/pagination.rs
//! PURPOSE: Pagination feature - page-window navigation over the row pipeline.
//! CONTEXT: Page count derives from the expanded model, the last stage before
//! windowing, so navigation guards see the same universe the window slices.
//! Changing the page size keeps the first row of the current window in view
//! rather than resetting to page zero.

use std::rc::Rc;

use crate::column::RowData;
use crate::error::TableError;
use crate::feature::{TableFeature, TableOps};
use crate::row_model::paginated;
use crate::state::{PaginationState, Updater};
use crate::table::Table;

pub struct PaginationFeature;

impl<T: RowData> TableFeature<T> for PaginationFeature {
    fn name(&self) -> &'static str {
        "pagination"
    }

    fn table_ops(&self, ops: &mut TableOps<T>) {
        ops.set_page_index = Some(Rc::new(|table, index| {
            table.mutate_pagination(Updater::Apply(Rc::new(move |old: PaginationState| {
                PaginationState {
                    page_index: index,
                    ..old
                }
            })));
        }));
        ops.set_page_size = Some(Rc::new(|table, size| {
            table.mutate_pagination(Updater::Apply(Rc::new(move |old: PaginationState| {
                // Keep the first visible row stable across the size change.
                let first_row = old.page_index * old.page_size;
                let page_index = if size == 0 { 0 } else { first_row / size };
                PaginationState {
                    page_index,
                    page_size: size,
                }
            })));
        }));
        ops.reset_page_index = Some(Rc::new(|table| {
            table.mutate_pagination(Updater::Apply(Rc::new(|old: PaginationState| {
                PaginationState {
                    page_index: 0,
                    ..old
                }
            })));
        }));
        ops.next_page = Some(Rc::new(|table| {
            if can_next_page(table)? {
                step_page(table, 1)?;
            }
            Ok(())
        }));
        ops.previous_page = Some(Rc::new(|table| {
            if can_previous_page(table)? {
                step_page(table, -1)?;
            }
            Ok(())
        }));
        ops.page_count = Some(Rc::new(|table| page_count(table)));
        ops.can_next_page = Some(Rc::new(|table| can_next_page(table)));
        ops.can_previous_page = Some(Rc::new(|table| can_previous_page(table)));
    }
}

fn page_count<T: RowData>(table: &Table<T>) -> Result<usize, TableError> {
    let model = table.expanded_row_model()?;
    let size = table.read_state(|state| state.pagination.page_size);
    Ok(paginated::page_count(model.rows.len(), size))
}

/// The page index after clamping to the current page count, which is what the
/// navigation guards compare against.
fn effective_page_index<T: RowData>(table: &Table<T>) -> Result<usize, TableError> {
    let count = page_count(table)?;
    let index = table.read_state(|state| state.pagination.page_index);
    Ok(paginated::clamp_page_index(index, count))
}

fn can_next_page<T: RowData>(table: &Table<T>) -> Result<bool, TableError> {
    let count = page_count(table)?;
    Ok(count > 0 && effective_page_index(table)? + 1 < count)
}

fn can_previous_page<T: RowData>(table: &Table<T>) -> Result<bool, TableError> {
    Ok(effective_page_index(table)? > 0)
}

fn step_page<T: RowData>(table: &Table<T>, delta: i64) -> Result<(), TableError> {
    let index = effective_page_index(table)?;
    let next = (index as i64 + delta).max(0) as usize;
    table.mutate_pagination(Updater::Apply(Rc::new(move |old: PaginationState| {
        PaginationState {
            page_index: next,
            ..old
        }
    })));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_change_preserves_first_row() {
        // Page 3 of size 10 starts at row 30; with size 25 that row lands on
        // page 1.
        let old = PaginationState {
            page_index: 3,
            page_size: 10,
        };
        let first_row = old.page_index * old.page_size;
        assert_eq!(first_row / 25, 1);
    }
}
