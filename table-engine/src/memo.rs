//! FILENAME: table-engine/src/memo.rs
//! PURPOSE: Dependency-tracked memoization used by every derivation stage.
//! CONTEXT: Each pipeline stage declares an exact dependency tuple. A stage is
//! recomputed only when a declared dependency fails its equality check; shared
//! `Rc` inputs compare by pointer identity, value-typed state slices by content.
//! This replaces implicit reactive dependency tracking with an explicit cache
//! and manual invalidation.

use std::cell::RefCell;
use std::rc::Rc;

/// Equality as seen by the memoization layer.
///
/// `Rc` dependencies compare by pointer so that an unchanged upstream model is
/// recognized without walking it; plain state slices compare by value.
pub trait Dep: Clone {
    fn dep_eq(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Dep for Rc<T> {
    fn dep_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: PartialEq + Clone> Dep for Vec<T> {
    fn dep_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: PartialEq + Clone> Dep for Option<T> {
    fn dep_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Implements `Dep` by value equality for plain state types.
macro_rules! impl_dep_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Dep for $ty {
                fn dep_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_dep_by_value!(
    bool,
    usize,
    u64,
    String,
    crate::state::PaginationState,
    crate::state::ExpandedState,
    crate::state::FilterValue,
    crate::state::ColumnPinningState,
);

macro_rules! impl_dep_for_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Dep),+> Dep for ($($name,)+) {
            fn dep_eq(&self, other: &Self) -> bool {
                $(self.$idx.dep_eq(&other.$idx))&&+
            }
        }
    };
}

impl_dep_for_tuple!(A: 0);
impl_dep_for_tuple!(A: 0, B: 1);
impl_dep_for_tuple!(A: 0, B: 1, C: 2);
impl_dep_for_tuple!(A: 0, B: 1, C: 2, D: 3);

/// A single-slot cache gated by a dependency tuple.
///
/// Holds at most one `(deps, value)` pair. A lookup whose dependencies match the
/// cached pair returns a clone of the cached value (for `Rc` values this is the
/// identical instance). Failed computations are never cached.
pub struct Memo<D, V> {
    label: &'static str,
    slot: RefCell<Option<(D, V)>>,
}

impl<D: Dep, V: Clone> Memo<D, V> {
    pub fn new(label: &'static str) -> Self {
        Memo {
            label,
            slot: RefCell::new(None),
        }
    }

    /// Returns the cached value when `deps` match, otherwise recomputes.
    pub fn get_or_insert_with(&self, deps: D, compute: impl FnOnce() -> V) -> V {
        {
            let slot = self.slot.borrow();
            if let Some((cached, value)) = slot.as_ref() {
                if cached.dep_eq(&deps) {
                    log::trace!("memo hit: {}", self.label);
                    return value.clone();
                }
            }
        }
        log::debug!("memo recompute: {}", self.label);
        let value = compute();
        *self.slot.borrow_mut() = Some((deps, value.clone()));
        value
    }

    /// Fallible variant. Errors propagate without touching the cached pair.
    pub fn try_get_or_insert_with<E>(
        &self,
        deps: D,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        {
            let slot = self.slot.borrow();
            if let Some((cached, value)) = slot.as_ref() {
                if cached.dep_eq(&deps) {
                    log::trace!("memo hit: {}", self.label);
                    return Ok(value.clone());
                }
            }
        }
        log::debug!("memo recompute: {}", self.label);
        let value = compute()?;
        *self.slot.borrow_mut() = Some((deps, value.clone()));
        Ok(value)
    }

    /// Drops the cached pair. The next lookup recomputes unconditionally.
    pub fn invalidate(&self) {
        *self.slot.borrow_mut() = None;
    }

    /// The cached value, if any, without checking dependencies.
    pub fn peek(&self) -> Option<V> {
        self.slot.borrow().as_ref().map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_identical_instance() {
        let memo: Memo<(Rc<Vec<i32>>,), Rc<Vec<i32>>> = Memo::new("test");
        let input = Rc::new(vec![1, 2, 3]);

        let first = memo.get_or_insert_with((input.clone(),), || Rc::new(vec![3, 2, 1]));
        let second = memo.get_or_insert_with((input.clone(),), || panic!("must not recompute"));
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_rc_dep_compares_by_pointer() {
        let memo: Memo<(Rc<Vec<i32>>,), usize> = Memo::new("test");
        let a = Rc::new(vec![1]);
        let b = Rc::new(vec![1]); // value-equal, different allocation

        let mut runs = 0;
        memo.get_or_insert_with((a,), || {
            runs += 1;
            runs
        });
        memo.get_or_insert_with((b,), || {
            runs += 1;
            runs
        });
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_value_dep_compares_by_content() {
        let memo: Memo<(Vec<String>,), usize> = Memo::new("test");
        let mut runs = 0;
        memo.get_or_insert_with((vec!["a".to_string()],), || {
            runs += 1;
            runs
        });
        // A fresh but equal vec is a hit
        memo.get_or_insert_with((vec!["a".to_string()],), || {
            runs += 1;
            runs
        });
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_error_is_not_cached() {
        let memo: Memo<(usize,), usize> = Memo::new("test");
        let result: Result<usize, &str> = memo.try_get_or_insert_with((1,), || Err("boom"));
        assert!(result.is_err());
        let result: Result<usize, &str> = memo.try_get_or_insert_with((1,), || Ok(7));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let memo: Memo<(usize,), usize> = Memo::new("test");
        let mut runs = 0;
        memo.get_or_insert_with((1,), || {
            runs += 1;
            runs
        });
        memo.invalidate();
        memo.get_or_insert_with((1,), || {
            runs += 1;
            runs
        });
        assert_eq!(runs, 2);
    }
}
