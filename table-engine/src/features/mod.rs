//! FILENAME: table-engine/src/features/mod.rs
//! Built-in feature modules.
//!
//! Each module is one self-contained `TableFeature`: default state, default
//! options (including its built-in named function table, if any) and the
//! operations it contributes to the per-entity slot tables. Declaration order
//! in the registry matters: a later feature overwrites identically named
//! slots, and `validate` may require slots filled by earlier features.

pub mod expanding;
pub mod faceting;
pub mod filters;
pub mod grouping;
pub mod pagination;
pub mod pinning;
pub mod sizing;
pub mod sorting;
pub mod visibility;
