//! FILENAME: table-engine/src/row_model/mod.rs
//! Row-model derivation pipeline.
//!
//! Stage order: core -> filtered -> (faceted side-branch) -> sorted ->
//! grouped -> expanded -> paginated. Each stage consumes the previous stage's
//! output plus the relevant state slice and produces a fresh immutable
//! `RowModel`; a stage with nothing to do returns its input unchanged so
//! memoization sees the identical instance. Stages never mutate their input
//! and never inspect a later stage's output.

pub mod core;
pub mod expanded;
pub mod faceted;
pub mod filtered;
pub mod grouped;
pub mod paginated;
pub mod sorted;
