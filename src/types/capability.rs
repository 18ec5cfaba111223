use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::hashing::{StableHasher, stable_hash};

/// Equality and hashing for one projected value type.
///
/// Implementations must keep `hash` consistent with `equals`: values that
/// compare equal must hash identically.
pub trait EqualityCapability<V: ?Sized>: Send + Sync {
    fn equals(&self, x: &V, y: &V) -> bool;
    fn hash(&self, obj: &V) -> u64;
}

/// Three-way ordering for one projected value type.
pub trait OrderCapability<V: ?Sized>: Send + Sync {
    fn compare(&self, x: &V, y: &V) -> Ordering;
}

/// The default capability: the value's own `Eq`, `Hash` and `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<V: Eq + Hash + ?Sized> EqualityCapability<V> for Natural {
    fn equals(&self, x: &V, y: &V) -> bool {
        x == y
    }

    fn hash(&self, obj: &V) -> u64 {
        stable_hash(obj)
    }
}

impl<V: Ord + ?Sized> OrderCapability<V> for Natural {
    fn compare(&self, x: &V, y: &V) -> Ordering {
        x.cmp(y)
    }
}

/// Case-insensitive text comparison (ASCII case folding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiCaseInsensitive;

fn folded(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes().map(|b| b.to_ascii_lowercase())
}

impl<V: AsRef<str> + ?Sized> EqualityCapability<V> for AsciiCaseInsensitive {
    fn equals(&self, x: &V, y: &V) -> bool {
        x.as_ref().eq_ignore_ascii_case(y.as_ref())
    }

    fn hash(&self, obj: &V) -> u64 {
        let mut hasher = StableHasher::default();
        for byte in folded(obj.as_ref()) {
            hasher.write_u8(byte);
        }
        hasher.finish()
    }
}

impl<V: AsRef<str> + ?Sized> OrderCapability<V> for AsciiCaseInsensitive {
    fn compare(&self, x: &V, y: &V) -> Ordering {
        folded(x.as_ref()).cmp(folded(y.as_ref()))
    }
}

/// Reverses the order produced by the wrapped capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Descending<C>(pub C);

impl<V: ?Sized, C: OrderCapability<V>> OrderCapability<V> for Descending<C> {
    fn compare(&self, x: &V, y: &V) -> Ordering {
        self.0.compare(x, y).reverse()
    }
}

/// Equality capability assembled from two closures. See [`equality_by`].
#[derive(Clone, Copy)]
pub struct FnEquality<E, H> {
    equals: E,
    hash: H,
}

impl<V, E, H> EqualityCapability<V> for FnEquality<E, H>
where
    V: ?Sized,
    E: Fn(&V, &V) -> bool + Send + Sync,
    H: Fn(&V) -> u64 + Send + Sync,
{
    fn equals(&self, x: &V, y: &V) -> bool {
        (self.equals)(x, y)
    }

    fn hash(&self, obj: &V) -> u64 {
        (self.hash)(obj)
    }
}

/// Order capability wrapping a closure. See [`order_by`].
#[derive(Clone, Copy)]
pub struct FnOrder<C>(C);

impl<V, C> OrderCapability<V> for FnOrder<C>
where
    V: ?Sized,
    C: Fn(&V, &V) -> Ordering + Send + Sync,
{
    fn compare(&self, x: &V, y: &V) -> Ordering {
        (self.0)(x, y)
    }
}

/// Build an equality capability from an equality predicate and a hash
/// function. The caller is responsible for keeping them consistent.
pub fn equality_by<V, E, H>(equals: E, hash: H) -> FnEquality<E, H>
where
    V: ?Sized,
    E: Fn(&V, &V) -> bool + Send + Sync,
    H: Fn(&V) -> u64 + Send + Sync,
{
    FnEquality { equals, hash }
}

/// Build an order capability from a three-way comparison closure.
pub fn order_by<V, C>(compare: C) -> FnOrder<C>
where
    V: ?Sized,
    C: Fn(&V, &V) -> Ordering + Send + Sync,
{
    FnOrder(compare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_follows_std_traits() {
        assert!(EqualityCapability::<i32>::equals(&Natural, &3, &3));
        assert!(!EqualityCapability::<i32>::equals(&Natural, &3, &4));
        assert_eq!(OrderCapability::<i32>::compare(&Natural, &3, &4), Ordering::Less);
        assert_eq!(
            EqualityCapability::<str>::hash(&Natural, "abc"),
            stable_hash("abc")
        );
    }

    #[test]
    fn case_insensitive_equality_and_hash_agree() {
        let cmp = AsciiCaseInsensitive;
        assert!(EqualityCapability::<str>::equals(&cmp, "Hello", "hELLO"));
        assert_eq!(
            EqualityCapability::<str>::hash(&cmp, "Hello"),
            EqualityCapability::<str>::hash(&cmp, "hELLO")
        );
        assert!(!EqualityCapability::<str>::equals(&cmp, "a", "c"));
    }

    #[test]
    fn case_insensitive_order() {
        let cmp = AsciiCaseInsensitive;
        assert_eq!(OrderCapability::<str>::compare(&cmp, "a", "A"), Ordering::Equal);
        assert_eq!(OrderCapability::<str>::compare(&cmp, "a", "C"), Ordering::Less);
        assert_eq!(OrderCapability::<str>::compare(&cmp, "ab", "A"), Ordering::Greater);
    }

    #[test]
    fn descending_reverses() {
        let cmp = Descending(Natural);
        assert_eq!(OrderCapability::<u8>::compare(&cmp, &1, &2), Ordering::Greater);
        assert_eq!(OrderCapability::<u8>::compare(&cmp, &2, &2), Ordering::Equal);
    }

    #[test]
    fn closure_capabilities() {
        let parity = equality_by(|a: &i64, b: &i64| a % 2 == b % 2, |a: &i64| (a % 2) as u64);
        assert!(parity.equals(&2, &4));
        assert_eq!(parity.hash(&2), parity.hash(&4));

        let by_len = order_by(|a: &String, b: &String| a.len().cmp(&b.len()));
        assert_eq!(
            by_len.compare(&"zz".to_owned(), &"aaa".to_owned()),
            Ordering::Less
        );
    }
}
