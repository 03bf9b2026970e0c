//! FILENAME: table-engine/src/features/faceting.rs
//! PURPOSE: Faceting feature - per-column filter-candidate projections.
//! CONTEXT: Facets answer "what values could this column be filtered to, and
//! what would remain" by re-running the filter stage with the column's own
//! filter excluded. The projections layer on top of the filters feature, so
//! composing faceting without filters is a construction error.

use std::rc::Rc;

use crate::column::RowData;
use crate::error::TableError;
use crate::feature::{ColumnOps, ComposedOps, TableFeature};
use crate::row_model::faceted;

pub struct FacetingFeature;

impl<T: RowData> TableFeature<T> for FacetingFeature {
    fn name(&self) -> &'static str {
        "faceting"
    }

    fn column_ops(&self, ops: &mut ColumnOps<T>) {
        ops.faceted_row_model = Some(Rc::new(|table, column| {
            faceted::faceted_row_model(table, &column.id)
        }));
        ops.faceted_unique_values = Some(Rc::new(|table, column| {
            faceted::faceted_unique_values(table, &column.id)
        }));
        ops.faceted_min_max = Some(Rc::new(|table, column| {
            faceted::faceted_min_max(table, &column.id)
        }));
    }

    fn validate(&self, ops: &ComposedOps<T>) -> Result<(), TableError> {
        if ops.column.set_filter_value.is_none() {
            return Err(TableError::MissingFeature {
                feature: "faceting",
                requires: "filters",
            });
        }
        Ok(())
    }
}
