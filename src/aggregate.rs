//! The aggregation algebra: how per-rule results combine into whole-object
//! results, and how absent (null) operands are ordered and hashed.

use std::cmp::Ordering;
use std::ptr;
use std::sync::Arc;

use crate::hashing;
use crate::synthesize::{CompareFn, EqualityStep, EqualsFn, HashFn, OrderStep};

/// AND over every step, left to right, stopping at the first `false`.
pub(crate) fn all_equal<T: ?Sized + 'static>(steps: &Arc<[EqualityStep<T>]>) -> EqualsFn<T> {
    if let [only] = &steps[..] {
        return Arc::clone(&only.equals);
    }
    let steps = Arc::clone(steps);
    Arc::new(move |x: &T, y: &T| steps.iter().all(|step| (step.equals)(x, y)))
}

/// XOR of every step's hash, the contribution at index `i` rotated left by
/// `i` bits.
pub(crate) fn rotate_xor<T: ?Sized + 'static>(steps: &Arc<[EqualityStep<T>]>) -> HashFn<T> {
    if let [only] = &steps[..] {
        return Arc::clone(&only.hash);
    }
    let steps = Arc::clone(steps);
    Arc::new(move |obj: &T| {
        steps
            .iter()
            .enumerate()
            .fold(0, |acc, (index, step)| hashing::fold(acc, index, (step.hash)(obj)))
    })
}

/// Lexicographic comparison: the first declared rule is the primary key.
///
/// Equivalent to scanning the rules from last to first and keeping the last
/// nonzero result seen; evaluating front to back lets it stop at the first
/// nonzero result instead.
pub(crate) fn lexicographic<T: ?Sized + 'static>(steps: &Arc<[OrderStep<T>]>) -> CompareFn<T> {
    if let [only] = &steps[..] {
        return Arc::clone(&only.compare);
    }
    let steps = Arc::clone(steps);
    Arc::new(move |x: &T, y: &T| {
        steps
            .iter()
            .map(|step| (step.compare)(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Equality with null safety: both absent are equal, one absent is not.
pub(crate) fn null_safe_equals<V: ?Sized>(
    x: Option<&V>,
    y: Option<&V>,
    equals: impl FnOnce(&V, &V) -> bool,
) -> bool {
    match (x, y) {
        (Some(a), Some(b)) => equals(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Reference-like equality: identical references are equal without
/// consulting `equals`, then null safety applies.
pub(crate) fn equals_nullable<V: ?Sized>(
    x: Option<&V>,
    y: Option<&V>,
    equals: impl FnOnce(&V, &V) -> bool,
) -> bool {
    if let (Some(a), Some(b)) = (x, y) {
        if ptr::eq(a, b) {
            return true;
        }
    }
    null_safe_equals(x, y, equals)
}

/// Ordering with null safety: absent sorts first.
pub(crate) fn null_safe_compare<V: ?Sized>(
    x: Option<&V>,
    y: Option<&V>,
    compare: impl FnOnce(&V, &V) -> Ordering,
) -> Ordering {
    match (x, y) {
        (Some(a), Some(b)) => compare(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// Reference-like ordering: identical references compare equal, then
/// absent sorts first.
pub(crate) fn compare_nullable<V: ?Sized>(
    x: Option<&V>,
    y: Option<&V>,
    compare: impl FnOnce(&V, &V) -> Ordering,
) -> Ordering {
    if let (Some(a), Some(b)) = (x, y) {
        if ptr::eq(a, b) {
            return Ordering::Equal;
        }
    }
    null_safe_compare(x, y, compare)
}

/// Absent values hash to zero.
pub(crate) fn hash_nullable<V: ?Sized>(obj: Option<&V>, hash: impl FnOnce(&V) -> u64) -> u64 {
    obj.map_or(0, hash)
}
