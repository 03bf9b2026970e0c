//! FILENAME: table-engine/src/error.rs

use thiserror::Error;

/// Configuration errors raised at table construction or on the first use of a
/// misconfigured operation. Logical no-ops (absent filter values, empty pages,
/// empty facet maps) are not errors and return neutral values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column id: {0}")]
    DuplicateColumnId(String),

    #[error("column definition has neither an id nor a header to derive one from")]
    MissingColumnId,

    #[error("unknown column id: {0}")]
    UnknownColumn(String),

    #[error("duplicate row id: {0}")]
    DuplicateRowId(String),

    #[error("unknown sorting function '{name}' referenced by column '{column}'")]
    UnknownSortingFn { column: String, name: String },

    #[error("unknown filter function '{name}' referenced by column '{column}'")]
    UnknownFilterFn { column: String, name: String },

    #[error("unknown aggregation function '{name}' referenced by column '{column}'")]
    UnknownAggregationFn { column: String, name: String },

    #[error("feature '{feature}' requires '{requires}', which no registered feature provides")]
    MissingFeature {
        feature: &'static str,
        requires: &'static str,
    },

    #[error("operation '{0}' is not provided by any registered feature")]
    MissingOperation(&'static str),
}
