//! FILENAME: table-engine/src/cell.rs
//! PURPOSE: On-demand (row, column) cell handles.
//! CONTEXT: Cells carry no independent identity and no storage; they are
//! constructed whenever a row's cell list is requested.

use std::rc::Rc;

use crate::column::{Column, RowData};
use crate::error::TableError;
use crate::row::Row;
use crate::table::Table;
use crate::value::TableValue;

pub struct CellRef<'t, T> {
    pub(crate) table: &'t Table<T>,
    pub(crate) row: Rc<Row<T>>,
    pub(crate) column: Rc<Column<T>>,
}

impl<'t, T: RowData> CellRef<'t, T> {
    pub fn id(&self) -> String {
        format!("{}_{}", self.row.id, self.column.id)
    }

    pub fn row(&self) -> &Rc<Row<T>> {
        &self.row
    }

    pub fn column(&self) -> &Rc<Column<T>> {
        &self.column
    }

    pub fn value(&self) -> TableValue {
        self.row.value(&self.column)
    }

    /// The cell sits in the column this synthetic row is grouped by.
    pub fn is_grouped(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .cell
            .is_grouped
            .as_ref()
            .ok_or(TableError::MissingOperation("cell.is_grouped"))?;
        Ok(op(self.table, &self.row, &self.column))
    }

    /// The cell shows an aggregate over a group row's leaves.
    pub fn is_aggregated(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .cell
            .is_aggregated
            .as_ref()
            .ok_or(TableError::MissingOperation("cell.is_aggregated"))?;
        Ok(op(self.table, &self.row, &self.column))
    }

    /// A leaf row's cell in a currently grouped column.
    pub fn is_placeholder(&self) -> Result<bool, TableError> {
        let op = self
            .table
            .ops()
            .cell
            .is_placeholder
            .as_ref()
            .ok_or(TableError::MissingOperation("cell.is_placeholder"))?;
        Ok(op(self.table, &self.row, &self.column))
    }
}
