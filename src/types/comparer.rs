use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::error::{ComparerError, InvariantViolation};
use crate::aggregate;
use crate::synthesize::{CompareFn, EqualityPlan, EqualityStep, EqualsFn, HashFn, OrderPlan, OrderStep};

/// Synthesized equality and hashing for `T`.
///
/// Immutable and cheap to clone; share it across threads freely.
pub struct EqualityComparer<T: ?Sized> {
    equals: EqualsFn<T>,
    hash: HashFn<T>,
}

impl<T: ?Sized> EqualityComparer<T> {
    pub(crate) fn from_plan(plan: EqualityPlan<T>) -> Self {
        Self {
            equals: plan.equals,
            hash: plan.hash,
        }
    }

    #[must_use]
    pub fn equals(&self, x: &T, y: &T) -> bool {
        (self.equals)(x, y)
    }

    /// A hash consistent with [`equals`](Self::equals): equal values hash
    /// identically. Stable across runs.
    #[must_use]
    pub fn hash(&self, obj: &T) -> u64 {
        (self.hash)(obj)
    }

    /// Equality over possibly absent operands. The same reference is equal to
    /// itself without evaluating any rule; two absent operands are equal.
    #[must_use]
    pub fn equals_nullable(&self, x: Option<&T>, y: Option<&T>) -> bool {
        aggregate::equals_nullable(x, y, |a, b| self.equals(a, b))
    }

    /// Hash of a possibly absent operand; absent hashes to zero.
    #[must_use]
    pub fn hash_nullable(&self, obj: Option<&T>) -> u64 {
        aggregate::hash_nullable(obj, |v| self.hash(v))
    }
}

impl<T> EqualityComparer<T> {
    /// Wrap `value` so that it implements `Eq` and `Hash` through this
    /// comparer, e.g. for use as a `HashMap` key.
    #[must_use]
    pub fn key(&self, value: T) -> HashKey<T> {
        HashKey {
            value,
            comparer: self.clone(),
        }
    }
}

impl<T: ?Sized> Clone for EqualityComparer<T> {
    fn clone(&self) -> Self {
        Self {
            equals: Arc::clone(&self.equals),
            hash: Arc::clone(&self.hash),
        }
    }
}

impl<T: ?Sized> fmt::Debug for EqualityComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EqualityComparer<{}>", type_name::<T>())
    }
}

/// Synthesized three-way comparison for `T`.
///
/// The first declared rule is the primary key; later rules only break ties.
pub struct OrderComparer<T: ?Sized> {
    compare: CompareFn<T>,
}

impl<T: ?Sized> OrderComparer<T> {
    pub(crate) fn from_plan(plan: OrderPlan<T>) -> Self {
        Self {
            compare: plan.compare,
        }
    }

    #[must_use]
    pub fn compare(&self, x: &T, y: &T) -> Ordering {
        (self.compare)(x, y)
    }

    /// Comparison over possibly absent operands: absent sorts first, and the
    /// same reference compares equal without evaluating any rule.
    #[must_use]
    pub fn compare_nullable(&self, x: Option<&T>, y: Option<&T>) -> Ordering {
        aggregate::compare_nullable(x, y, |a, b| self.compare(a, b))
    }
}

impl<T> OrderComparer<T> {
    /// Stable sort of `items` by this comparer.
    pub fn sort(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }

    /// Wrap `value` so that it implements `Ord` through this comparer, e.g.
    /// for use as a `BTreeMap` key.
    #[must_use]
    pub fn key(&self, value: T) -> SortKey<T> {
        SortKey {
            value,
            comparer: self.clone(),
        }
    }
}

impl<T: ?Sized> Clone for OrderComparer<T> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T: ?Sized> fmt::Debug for OrderComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderComparer<{}>", type_name::<T>())
    }
}

/// An [`EqualityComparer`] that reports the first rule responsible when two
/// values expected to be equal are not.
pub struct CheckedEqualityComparer<T: ?Sized> {
    inner: EqualityComparer<T>,
    steps: Arc<[EqualityStep<T>]>,
}

impl<T: ?Sized> CheckedEqualityComparer<T> {
    pub(crate) fn from_plan(plan: EqualityPlan<T>) -> Self {
        Self {
            steps: Arc::clone(&plan.steps),
            inner: EqualityComparer::from_plan(plan),
        }
    }

    /// The unchecked comparer.
    #[must_use]
    pub fn comparer(&self) -> &EqualityComparer<T> {
        &self.inner
    }

    #[must_use]
    pub fn equals(&self, x: &T, y: &T) -> bool {
        self.inner.equals(x, y)
    }

    #[must_use]
    pub fn hash(&self, obj: &T) -> u64 {
        self.inner.hash(obj)
    }
}

impl<T: ?Sized + fmt::Debug> CheckedEqualityComparer<T> {
    /// # Errors
    ///
    /// Returns [`ComparerError::InvariantViolation`] naming both operands and
    /// the first rule that found them unequal.
    pub fn assert_equals(&self, x: &T, y: &T) -> Result<(), ComparerError> {
        let Some(step) = self.steps.iter().find(|step| !(step.equals)(x, y)) else {
            return Ok(());
        };
        let violation = InvariantViolation::new("equal", format!("{x:?}"), format!("{y:?}"))
            .blame((*step.info).clone(), (step.render)(x), (step.render)(y));
        Err(violation.into())
    }
}

impl<T: ?Sized> Clone for CheckedEqualityComparer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<T: ?Sized> fmt::Debug for CheckedEqualityComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedEqualityComparer")
            .field("compared_type", &type_name::<T>())
            .field("rules", &self.steps.len())
            .finish()
    }
}

/// An [`OrderComparer`] that reports the primary-most rule responsible when
/// two values expected to be equivalent are not.
pub struct CheckedOrderComparer<T: ?Sized> {
    inner: OrderComparer<T>,
    steps: Arc<[OrderStep<T>]>,
}

impl<T: ?Sized> CheckedOrderComparer<T> {
    pub(crate) fn from_plan(plan: OrderPlan<T>) -> Self {
        Self {
            steps: Arc::clone(&plan.steps),
            inner: OrderComparer::from_plan(plan),
        }
    }

    /// The unchecked comparer.
    #[must_use]
    pub fn comparer(&self) -> &OrderComparer<T> {
        &self.inner
    }

    #[must_use]
    pub fn compare(&self, x: &T, y: &T) -> Ordering {
        self.inner.compare(x, y)
    }
}

impl<T: ?Sized + fmt::Debug> CheckedOrderComparer<T> {
    /// # Errors
    ///
    /// Returns [`ComparerError::InvariantViolation`] naming both operands and
    /// the first rule in declared order that found them different.
    pub fn assert_equivalent(&self, x: &T, y: &T) -> Result<(), ComparerError> {
        let Some(step) = self.steps.iter().find(|step| (step.compare)(x, y).is_ne()) else {
            return Ok(());
        };
        let violation = InvariantViolation::new("equivalent", format!("{x:?}"), format!("{y:?}"))
            .blame((*step.info).clone(), (step.render)(x), (step.render)(y));
        Err(violation.into())
    }
}

impl<T: ?Sized> Clone for CheckedOrderComparer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<T: ?Sized> fmt::Debug for CheckedOrderComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedOrderComparer")
            .field("compared_type", &type_name::<T>())
            .field("rules", &self.steps.len())
            .finish()
    }
}

/// A value whose `Eq` and `Hash` are those of an [`EqualityComparer`].
pub struct HashKey<T> {
    value: T,
    comparer: EqualityComparer<T>,
}

impl<T> HashKey<T> {
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> PartialEq for HashKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.comparer.equals(&self.value, &other.value)
    }
}

impl<T> Eq for HashKey<T> {}

impl<T> Hash for HashKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.comparer.hash(&self.value));
    }
}

impl<T: Clone> Clone for HashKey<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            comparer: self.comparer.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HashKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashKey").field(&self.value).finish()
    }
}

/// A value whose `Ord` is that of an [`OrderComparer`].
pub struct SortKey<T> {
    value: T,
    comparer: OrderComparer<T>,
}

impl<T> SortKey<T> {
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> PartialEq for SortKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl<T> Eq for SortKey<T> {}

impl<T> PartialOrd for SortKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for SortKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparer.compare(&self.value, &other.value)
    }
}

impl<T: Clone> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            comparer: self.comparer.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SortKey").field(&self.value).finish()
    }
}
