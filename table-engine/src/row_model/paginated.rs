//! FILENAME: table-engine/src/row_model/paginated.rs
//! PURPOSE: Paginated stage - fixed-size window over the expanded model.

use std::rc::Rc;

use crate::column::RowData;
use crate::row::RowModel;
use crate::state::PaginationState;
use crate::table::Table;

/// Slices the current rows into the requested page. The page index is clamped
/// into `[0, page_count - 1]`; an empty input or zero page size yields an
/// empty window, never an error.
pub(crate) fn paginate_rows<T: RowData>(
    table: &Table<T>,
    input: &Rc<RowModel<T>>,
    pagination: &PaginationState,
) -> Rc<RowModel<T>> {
    if !table.options().enable_pagination {
        return input.clone();
    }
    let size = pagination.page_size;
    if size == 0 || input.rows.is_empty() {
        return Rc::new(RowModel::empty());
    }

    let count = page_count(input.rows.len(), size);
    let index = clamp_page_index(pagination.page_index, count);
    let start = index * size;
    let end = (start + size).min(input.rows.len());
    Rc::new(RowModel::from_rows(input.rows[start..end].to_vec()))
}

pub(crate) fn page_count(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_rows.div_ceil(page_size)
    }
}

pub(crate) fn clamp_page_index(page_index: usize, page_count: usize) -> usize {
    page_index.min(page_count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_clamp_page_index() {
        assert_eq!(clamp_page_index(0, 3), 0);
        assert_eq!(clamp_page_index(5, 3), 2);
        assert_eq!(clamp_page_index(5, 0), 0);
    }
}
