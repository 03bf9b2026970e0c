//! FILENAME: table-engine/src/header.rs
//! PURPOSE: Header group derivation from the column tree.
//! CONTEXT: Header groups are a pure function of the ordered visible leaf
//! columns (which already encode visibility and the pinned partition) plus the
//! column tree. They are rebuilt whenever either changes and are never
//! cross-cached with row-model state.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::column::Column;
use crate::state::ColumnId;

pub struct Header<T> {
    pub id: String,
    pub column: Rc<Column<T>>,
    pub depth: usize,
    /// Number of leaf columns this header spans.
    pub col_span: usize,
    /// True when a shallow leaf is repeated to fill a deeper level.
    pub is_placeholder: bool,
}

impl<T> Clone for Header<T> {
    fn clone(&self) -> Self {
        Header {
            id: self.id.clone(),
            column: self.column.clone(),
            depth: self.depth,
            col_span: self.col_span,
            is_placeholder: self.is_placeholder,
        }
    }
}

pub struct HeaderGroup<T> {
    pub id: String,
    pub depth: usize,
    pub headers: Vec<Header<T>>,
}

/// Builds one header group per tree level, top level first. Adjacent headers
/// for the same ancestor column merge into a single spanning header.
pub(crate) fn build_header_groups<T>(
    leaf_columns: &[Rc<Column<T>>],
    by_id: &FxHashMap<ColumnId, Rc<Column<T>>>,
) -> Vec<HeaderGroup<T>> {
    let max_depth = leaf_columns.iter().map(|c| c.depth).max().unwrap_or(0);

    let mut groups = Vec::with_capacity(max_depth + 1);
    for level in 0..=max_depth {
        let mut headers: Vec<Header<T>> = Vec::new();
        for leaf in leaf_columns {
            let (column, is_placeholder) = if leaf.depth >= level {
                (ancestor_at_depth(leaf, level, by_id), false)
            } else {
                // The leaf sits above this level; repeat it as a placeholder
                (leaf.clone(), true)
            };

            let merged = match headers.last_mut() {
                Some(prev)
                    if !prev.is_placeholder
                        && !is_placeholder
                        && prev.column.id == column.id =>
                {
                    prev.col_span += 1;
                    true
                }
                _ => false,
            };
            if !merged {
                headers.push(Header {
                    id: if is_placeholder {
                        format!("{}_{}_placeholder", level, column.id)
                    } else {
                        format!("{}_{}", level, column.id)
                    },
                    column,
                    depth: level,
                    col_span: 1,
                    is_placeholder,
                });
            }
        }
        groups.push(HeaderGroup {
            id: level.to_string(),
            depth: level,
            headers,
        });
    }
    groups
}

fn ancestor_at_depth<T>(
    leaf: &Rc<Column<T>>,
    depth: usize,
    by_id: &FxHashMap<ColumnId, Rc<Column<T>>>,
) -> Rc<Column<T>> {
    let mut current = leaf.clone();
    while current.depth > depth {
        match current
            .parent_id
            .as_ref()
            .and_then(|id| by_id.get(id).cloned())
        {
            Some(parent) => current = parent,
            // Orphaned depth (should not happen for a well-formed tree)
            None => break,
        }
    }
    current
}
