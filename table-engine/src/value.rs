//! FILENAME: table-engine/src/value.rs
//! PURPOSE: Dynamic cell value type shared by accessors, filters, sorting and faceting.
//! CONTEXT: Columns resolve raw row data into `TableValue`s. The type is hashable
//! (so faceting can use values as map keys) and carries a total order (so default
//! comparators always have a fallback).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Wrapper around f64 that implements Eq and Hash for use as map keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A normalized, hashable cell value.
///
/// Absent or unresolvable fields are `Null`, never an error. `Int` and `Float`
/// compare numerically against each other but remain distinct for Eq/Hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat),
    Text(String),
    DateTime(NaiveDateTime),
}

impl TableValue {
    /// Returns the numeric content of `Int`/`Float` values.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TableValue::Int(n) => Some(*n as f64),
            TableValue::Float(f) => Some(f.0),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TableValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TableValue::Null)
    }

    /// Rank used by the total order: Null < Bool < numbers < Text < DateTime.
    fn type_rank(&self) -> u8 {
        match self {
            TableValue::Null => 0,
            TableValue::Bool(_) => 1,
            TableValue::Int(_) | TableValue::Float(_) => 2,
            TableValue::Text(_) => 3,
            TableValue::DateTime(_) => 4,
        }
    }

    /// Variant tag used as the final tiebreak so the order stays total
    /// when an Int and a Float are numerically equal.
    fn variant_tag(&self) -> u8 {
        match self {
            TableValue::Null => 0,
            TableValue::Bool(_) => 1,
            TableValue::Int(_) => 2,
            TableValue::Float(_) => 3,
            TableValue::Text(_) => 4,
            TableValue::DateTime(_) => 5,
        }
    }
}

impl Ord for TableValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.type_rank().cmp(&other.type_rank());
        if rank != Ordering::Equal {
            return rank;
        }
        let within = match (self, other) {
            (TableValue::Null, TableValue::Null) => Ordering::Equal,
            (TableValue::Bool(a), TableValue::Bool(b)) => a.cmp(b),
            (TableValue::Text(a), TableValue::Text(b)) => a.cmp(b),
            (TableValue::DateTime(a), TableValue::DateTime(b)) => a.cmp(b),
            _ => {
                // Both numeric at this point
                let a = self.as_number().unwrap_or(f64::NAN);
                let b = other.as_number().unwrap_or(f64::NAN);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
        };
        within.then_with(|| self.variant_tag().cmp(&other.variant_tag()))
    }
}

impl PartialOrd for TableValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableValue::Null => write!(f, ""),
            TableValue::Bool(b) => write!(f, "{}", b),
            TableValue::Int(n) => write!(f, "{}", n),
            TableValue::Float(v) => write!(f, "{}", v.0),
            TableValue::Text(s) => write!(f, "{}", s),
            TableValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<i64> for TableValue {
    fn from(n: i64) -> Self {
        TableValue::Int(n)
    }
}

impl From<f64> for TableValue {
    fn from(n: f64) -> Self {
        TableValue::Float(OrderedFloat(n))
    }
}

impl From<bool> for TableValue {
    fn from(b: bool) -> Self {
        TableValue::Bool(b)
    }
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        TableValue::Text(s.to_string())
    }
}

impl From<String> for TableValue {
    fn from(s: String) -> Self {
        TableValue::Text(s)
    }
}

impl From<NaiveDateTime> for TableValue {
    fn from(dt: NaiveDateTime) -> Self {
        TableValue::DateTime(dt)
    }
}

impl<V: Into<TableValue>> From<Option<V>> for TableValue {
    fn from(v: Option<V>) -> Self {
        match v {
            Some(v) => v.into(),
            None => TableValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cross_variant_ordering() {
        assert_eq!(
            TableValue::Int(2).cmp(&TableValue::from(10.0)),
            Ordering::Less
        );
        assert_eq!(
            TableValue::from(1.5).cmp(&TableValue::Int(1)),
            Ordering::Greater
        );
        // Numerically equal, distinct variants: order is deterministic
        assert_eq!(
            TableValue::Int(1).cmp(&TableValue::from(1.0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_null_sorts_first() {
        let mut values = vec![
            TableValue::from("b"),
            TableValue::Null,
            TableValue::Int(3),
        ];
        values.sort();
        assert_eq!(values[0], TableValue::Null);
        assert_eq!(values[1], TableValue::Int(3));
    }

    #[test]
    fn test_nan_is_hashable_and_self_equal() {
        use std::collections::HashMap;
        let mut map: HashMap<TableValue, usize> = HashMap::new();
        map.insert(TableValue::from(f64::NAN), 1);
        *map.entry(TableValue::from(f64::NAN)).or_insert(0) += 1;
        assert_eq!(map.len(), 1);
        assert_eq!(map[&TableValue::from(f64::NAN)], 2);
    }
}
