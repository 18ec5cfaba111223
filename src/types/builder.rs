use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use super::accessor::Accessor;
use super::capability::{EqualityCapability, Natural, OrderCapability};
use super::comparer::{
    CheckedEqualityComparer, CheckedOrderComparer, EqualityComparer, OrderComparer,
};
use super::error::ComparerError;
use super::interceptor::Interceptor;
use super::rule::{
    LeafRule, Member, NestedRule, Renderer, RuleKind, RuleMeta, Widened, render_debug,
    render_opaque,
};
use super::source::SourceTag;
use crate::synthesize::{self, EqualityPlan, OrderPlan};

/// Immutable, ordered description of how to compare values of `T`.
///
/// Every operation consumes the builder and returns a new one; clone it first
/// to keep the old rule set. Clones share rule storage, and appending to a
/// builder that is not shared reuses its storage.
///
/// The first declared rule is the primary key for ordering.
///
/// # Example
///
/// ```
/// use comparo::ComparerBuilder;
///
/// struct Version {
///     major: u32,
///     minor: u32,
///     tag: Option<String>,
/// }
///
/// let builder = ComparerBuilder::<Version>::new()
///     .add(|v: &Version| v.major)
///     .add(|v: &Version| v.minor)
///     .add_optional(|v: &Version| v.tag.as_ref());
///
/// let order = builder.build_order().unwrap();
/// let a = Version { major: 1, minor: 2, tag: None };
/// let b = Version { major: 1, minor: 2, tag: Some("rc1".into()) };
/// assert!(order.compare(&a, &b).is_lt());
/// ```
pub struct ComparerBuilder<T: ?Sized> {
    pub(crate) rules: Arc<Vec<Arc<dyn Member<T>>>>,
    pub(crate) interceptor: Option<Arc<dyn Interceptor>>,
}

/// Intermediate builder passed to the closure of [`ComparerBuilder::rule`].
///
/// The closure must call one of [`key`](Self::key), [`field`](Self::field) or
/// [`optional`](Self::optional). Under [`ComparerBuilder::rule_with_defaults`]
/// capabilities not requested are the natural ones of `V`. Under
/// [`ComparerBuilder::rule`] they stay absent and surface as
/// [`ComparerError::UnsupportedCapability`] when a comparer that needs them
/// is built.
pub struct RuleBuilder<T: ?Sized, V> {
    accessor: Option<Accessor<T, V>>,
    equality: Option<Arc<dyn EqualityCapability<V>>>,
    order: Option<Arc<dyn OrderCapability<V>>>,
    custom_equality: bool,
    custom_order: bool,
    render: Renderer<V>,
    label: Option<Cow<'static, str>>,
    source: SourceTag,
}

impl<T: ?Sized + 'static> ComparerBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Vec::new()),
            interceptor: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The interceptor attached with [`with_interceptor`](Self::with_interceptor).
    #[must_use]
    pub fn interceptor(&self) -> Option<&Arc<dyn Interceptor>> {
        self.interceptor.as_ref()
    }

    fn push(mut self, rule: Arc<dyn Member<T>>) -> Self {
        Arc::make_mut(&mut self.rules).push(rule);
        self
    }

    fn push_natural<V>(self, accessor: Accessor<T, V>, source: SourceTag) -> Self
    where
        V: Eq + Hash + Ord + fmt::Debug + 'static,
    {
        let meta = RuleMeta::new(None, source, type_name::<V>(), RuleKind::Leaf);
        let rule = LeafRule::new(
            accessor,
            Some(Arc::new(Natural)),
            Some(Arc::new(Natural)),
            render_debug::<V>,
            meta,
        );
        self.push(Arc::new(rule))
    }

    /// Compare a computed value with its natural `Eq`, `Hash` and `Ord`.
    #[track_caller]
    #[must_use]
    pub fn add<V, F>(self, key: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Eq + Hash + Ord + fmt::Debug + 'static,
    {
        let source = SourceTag::caller();
        self.push_natural(Accessor::key(key), source)
    }

    /// Compare a borrowed member with its natural `Eq`, `Hash` and `Ord`.
    #[track_caller]
    #[must_use]
    pub fn add_field<V, F>(self, field: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
        V: Eq + Hash + Ord + fmt::Debug + 'static,
    {
        let source = SourceTag::caller();
        self.push_natural(Accessor::field(field), source)
    }

    /// Compare a member that may be absent. Absent values are equal to each
    /// other, sort before present ones and hash to zero.
    #[track_caller]
    #[must_use]
    pub fn add_optional<V, F>(self, optional: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
        V: Eq + Hash + Ord + fmt::Debug + 'static,
    {
        let source = SourceTag::caller();
        self.push_natural(Accessor::optional(optional), source)
    }

    /// Compare a borrowed member with a capability providing both equality and
    /// ordering.
    #[track_caller]
    #[must_use]
    pub fn add_with<V, F, C>(self, field: F, comparer: C) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
        C: EqualityCapability<V> + OrderCapability<V> + 'static,
        V: 'static,
    {
        let source = SourceTag::caller();
        let comparer = Arc::new(comparer);
        let meta = RuleMeta::new(None, source, type_name::<V>(), RuleKind::Leaf)
            .customized(true, true);
        let rule = LeafRule::new(
            Accessor::field(field),
            Some(comparer.clone()),
            Some(comparer),
            render_opaque::<V>,
            meta,
        );
        self.push(Arc::new(rule))
    }

    /// Define a rule with explicit capabilities, label and source tag.
    ///
    /// # Errors
    ///
    /// Returns [`ComparerError::InvalidRule`] if the closure did not set an
    /// accessor.
    ///
    /// # Example
    ///
    /// ```
    /// use comparo::{ComparerBuilder, Descending};
    ///
    /// let by_len_desc = ComparerBuilder::<String>::new()
    ///     .rule(|r| r.key(|s: &String| s.len()).natural_equality().order(Descending(comparo::Natural)))
    ///     .unwrap()
    ///     .build_order()
    ///     .unwrap();
    /// assert!(by_len_desc.compare(&"abc".to_owned(), &"a".to_owned()).is_lt());
    /// ```
    #[track_caller]
    pub fn rule<V: 'static>(
        self,
        f: impl FnOnce(RuleBuilder<T, V>) -> RuleBuilder<T, V>,
    ) -> Result<Self, ComparerError> {
        let draft = f(RuleBuilder::new(SourceTag::caller()));
        let rule = draft.finish(self.len())?;
        Ok(self.push(Arc::new(rule)))
    }

    /// Like [`rule`](Self::rule), but equality and ordering start out as the
    /// natural ones of `V`. Capabilities set in the closure replace them.
    ///
    /// # Errors
    ///
    /// Returns [`ComparerError::InvalidRule`] if the closure did not set an
    /// accessor.
    ///
    /// # Example
    ///
    /// ```
    /// use comparo::{equality_by, ComparerBuilder};
    ///
    /// let builder = ComparerBuilder::<i32>::new()
    ///     .rule_with_defaults(|r| r.key(|v: &i32| *v).equality(equality_by(|a: &i32, b: &i32| a % 2 == b % 2, |v: &i32| (v % 2) as u64)))
    ///     .unwrap();
    /// assert!(builder.build_equality().unwrap().equals(&1, &3));
    /// assert!(builder.build_order().unwrap().compare(&1, &3).is_lt());
    /// ```
    #[track_caller]
    pub fn rule_with_defaults<V>(
        self,
        f: impl FnOnce(RuleBuilder<T, V>) -> RuleBuilder<T, V>,
    ) -> Result<Self, ComparerError>
    where
        V: Eq + Hash + Ord + 'static,
    {
        let draft = f(RuleBuilder::new(SourceTag::caller()).natural());
        let rule = draft.finish(self.len())?;
        Ok(self.push(Arc::new(rule)))
    }

    /// Compare a borrowed member with the comparer synthesized from `child`.
    #[track_caller]
    #[must_use]
    pub fn add_nested<V, F>(self, field: F, child: ComparerBuilder<V>) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
        V: 'static,
    {
        let source = SourceTag::caller();
        self.push(Arc::new(NestedRule::new(Accessor::field(field), child, source)))
    }

    /// Compare a computed value with the comparer synthesized from `child`.
    #[track_caller]
    #[must_use]
    pub fn add_nested_key<V, F>(self, key: F, child: ComparerBuilder<V>) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: 'static,
    {
        let source = SourceTag::caller();
        self.push(Arc::new(NestedRule::new(Accessor::key(key), child, source)))
    }

    /// Compare an optional member with the comparer synthesized from `child`.
    /// Identical references are equal without consulting the child.
    #[track_caller]
    #[must_use]
    pub fn add_nested_optional<V, F>(self, optional: F, child: ComparerBuilder<V>) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
        V: 'static,
    {
        let source = SourceTag::caller();
        self.push(Arc::new(NestedRule::new(
            Accessor::optional(optional),
            child,
            source,
        )))
    }

    /// Append the rules of `other` after the rules of `self`.
    ///
    /// If either side is empty the other one is returned unchanged, attached
    /// interceptor included. Otherwise the interceptor of `self` is kept.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Arc::make_mut(&mut self.rules).extend(other.rules.iter().cloned());
        self
    }

    /// Reinterpret this builder for a type that exposes `T` through `AsRef`.
    ///
    /// Rule positions, labels, source tags and the attached interceptor are
    /// preserved; each rule upcasts its operands before evaluating.
    #[must_use]
    pub fn widen<D>(self) -> ComparerBuilder<D>
    where
        D: AsRef<T> + ?Sized + 'static,
    {
        let rules = self
            .rules
            .iter()
            .map(|rule| Arc::new(Widened::<T, D>::new(Arc::clone(rule))) as Arc<dyn Member<D>>)
            .collect();
        ComparerBuilder {
            rules: Arc::new(rules),
            interceptor: self.interceptor,
        }
    }

    /// Attach an interceptor used by every comparer built from this builder,
    /// and by this builder when it is nested in another one.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        if let Some(current) = &self.interceptor {
            if Arc::ptr_eq(current, &interceptor) {
                return self;
            }
        }
        self.interceptor = Some(interceptor);
        self
    }

    #[must_use]
    pub fn without_interceptor(mut self) -> Self {
        self.interceptor = None;
        self
    }

    /// Synthesize equality and hashing.
    ///
    /// # Errors
    ///
    /// Returns [`ComparerError::EmptyBuilder`] if this builder or a nested
    /// child has no rules, and [`ComparerError::UnsupportedCapability`] if a
    /// rule has no equality capability.
    pub fn build_equality(&self) -> Result<EqualityComparer<T>, ComparerError> {
        self.equality_plan(self.interceptor.clone())
            .map(EqualityComparer::from_plan)
    }

    /// Like [`build_equality`](Self::build_equality), with `interceptor` in
    /// place of the attached one.
    ///
    /// # Errors
    ///
    /// Same as [`build_equality`](Self::build_equality).
    pub fn build_equality_with(
        &self,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<EqualityComparer<T>, ComparerError> {
        self.equality_plan(Some(interceptor))
            .map(EqualityComparer::from_plan)
    }

    /// Synthesize a three-way comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ComparerError::EmptyBuilder`] if this builder or a nested
    /// child has no rules, and [`ComparerError::UnsupportedCapability`] if a
    /// rule has no order capability.
    pub fn build_order(&self) -> Result<OrderComparer<T>, ComparerError> {
        self.order_plan(self.interceptor.clone())
            .map(OrderComparer::from_plan)
    }

    /// Like [`build_order`](Self::build_order), with `interceptor` in place
    /// of the attached one.
    ///
    /// # Errors
    ///
    /// Same as [`build_order`](Self::build_order).
    pub fn build_order_with(
        &self,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<OrderComparer<T>, ComparerError> {
        self.order_plan(Some(interceptor)).map(OrderComparer::from_plan)
    }

    /// Synthesize an equality comparer that can report which rule made two
    /// values unequal.
    ///
    /// # Errors
    ///
    /// Same as [`build_equality`](Self::build_equality).
    pub fn build_checked_equality(&self) -> Result<CheckedEqualityComparer<T>, ComparerError>
    where
        T: fmt::Debug,
    {
        self.equality_plan(self.interceptor.clone())
            .map(CheckedEqualityComparer::from_plan)
    }

    /// Synthesize an order comparer that can report which rule made two
    /// values differ.
    ///
    /// # Errors
    ///
    /// Same as [`build_order`](Self::build_order).
    pub fn build_checked_order(&self) -> Result<CheckedOrderComparer<T>, ComparerError>
    where
        T: fmt::Debug,
    {
        self.order_plan(self.interceptor.clone())
            .map(CheckedOrderComparer::from_plan)
    }

    pub(crate) fn equality_plan(
        &self,
        interceptor: Option<Arc<dyn Interceptor>>,
    ) -> Result<EqualityPlan<T>, ComparerError> {
        synthesize::equality(&self.rules, interceptor)
    }

    pub(crate) fn order_plan(
        &self,
        interceptor: Option<Arc<dyn Interceptor>>,
    ) -> Result<OrderPlan<T>, ComparerError> {
        synthesize::order(&self.rules, interceptor)
    }

    /// The interceptor a nested synthesis of this builder runs with.
    pub(crate) fn inherit(
        &self,
        parent: Option<&Arc<dyn Interceptor>>,
    ) -> Option<Arc<dyn Interceptor>> {
        self.interceptor.clone().or_else(|| parent.cloned())
    }
}

impl<T: ?Sized + 'static> Default for ComparerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ComparerBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ComparerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparerBuilder")
            .field("compared_type", &type_name::<T>())
            .field("rules", &self.rules.len())
            .field("intercepted", &self.interceptor.is_some())
            .finish()
    }
}

impl<T: ?Sized> fmt::Display for ComparerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComparerBuilder<{}>({} rules)",
            type_name::<T>(),
            self.rules.len()
        )
    }
}

impl<T: ?Sized + 'static, V: 'static> RuleBuilder<T, V> {
    fn new(source: SourceTag) -> Self {
        Self {
            accessor: None,
            equality: None,
            order: None,
            custom_equality: false,
            custom_order: false,
            render: render_opaque::<V>,
            label: None,
            source,
        }
    }

    /// Project a computed value.
    #[must_use]
    pub fn key<F>(mut self, key: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::key(key));
        self
    }

    /// Project a borrowed member.
    #[must_use]
    pub fn field<F>(mut self, field: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::field(field));
        self
    }

    /// Project a member that may be absent.
    #[must_use]
    pub fn optional<F>(mut self, optional: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::optional(optional));
        self
    }

    /// Natural equality, hashing and ordering.
    #[must_use]
    pub fn natural(self) -> Self
    where
        V: Eq + Hash + Ord,
    {
        self.natural_equality().natural_order()
    }

    #[must_use]
    pub fn natural_equality(mut self) -> Self
    where
        V: Eq + Hash,
    {
        self.equality = Some(Arc::new(Natural));
        self.custom_equality = false;
        self
    }

    #[must_use]
    pub fn natural_order(mut self) -> Self
    where
        V: Ord,
    {
        self.order = Some(Arc::new(Natural));
        self.custom_order = false;
        self
    }

    #[must_use]
    pub fn equality(mut self, capability: impl EqualityCapability<V> + 'static) -> Self {
        self.equality = Some(Arc::new(capability));
        self.custom_equality = true;
        self
    }

    #[must_use]
    pub fn order(mut self, capability: impl OrderCapability<V> + 'static) -> Self {
        self.order = Some(Arc::new(capability));
        self.custom_order = true;
        self
    }

    /// Use one capability for equality, hashing and ordering.
    #[must_use]
    pub fn comparer<C>(mut self, capability: C) -> Self
    where
        C: EqualityCapability<V> + OrderCapability<V> + 'static,
    {
        let capability = Arc::new(capability);
        self.equality = Some(capability.clone());
        self.order = Some(capability);
        self.custom_equality = true;
        self.custom_order = true;
        self
    }

    /// Render projected values through `Debug` for interceptors and
    /// violation reports.
    #[must_use]
    pub fn printable(mut self) -> Self
    where
        V: fmt::Debug,
    {
        self.render = render_debug::<V>;
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the source tag captured at the [`ComparerBuilder::rule`] call.
    #[must_use]
    pub fn source(mut self, source: SourceTag) -> Self {
        self.source = source;
        self
    }

    fn finish(self, position: usize) -> Result<LeafRule<T, V>, ComparerError> {
        let Some(accessor) = self.accessor else {
            return Err(ComparerError::InvalidRule {
                position,
                location: self.source,
                reason: "no accessor was set; call key, field or optional",
            });
        };
        let meta = RuleMeta::new(self.label, self.source, type_name::<V>(), RuleKind::Leaf)
            .customized(self.custom_equality, self.custom_order);
        Ok(LeafRule::new(
            accessor,
            self.equality,
            self.order,
            self.render,
            meta,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::{AsciiCaseInsensitive, PassThrough};

    #[derive(Debug, Clone)]
    struct Account {
        id: u32,
        owner: String,
        alias: Option<String>,
    }

    fn account(id: u32, owner: &str) -> Account {
        Account {
            id,
            owner: owner.into(),
            alias: None,
        }
    }

    #[test]
    fn builder_is_persistent() {
        let base = ComparerBuilder::<Account>::new().add(|a: &Account| a.id);
        let extended = base.clone().add_field(|a: &Account| &a.owner);
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(ComparerBuilder::<Account>::default().is_empty());
    }

    #[test]
    fn builder_display() {
        let builder = ComparerBuilder::<u8>::new().add(|v: &u8| *v).add(|v: &u8| *v % 2);
        assert_eq!(builder.to_string(), "ComparerBuilder<u8>(2 rules)");
    }

    #[test]
    fn rule_without_accessor_is_invalid() {
        let result = ComparerBuilder::<Account>::new()
            .add(|a: &Account| a.id)
            .rule::<u32>(|r| r.label("orphan").source(SourceTag::new("model.rs", 12)));
        match result {
            Err(ComparerError::InvalidRule {
                position, location, ..
            }) => {
                assert_eq!(position, 1);
                assert_eq!(location.to_string(), "model.rs (12)");
            }
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn rule_with_defaults_fills_omitted_order() {
        let builder = ComparerBuilder::<Account>::new()
            .rule_with_defaults(|r| {
                r.key(|a: &Account| a.id).equality(crate::equality_by(
                    |x: &u32, y: &u32| x % 2 == y % 2,
                    |v: &u32| u64::from(v % 2),
                ))
            })
            .unwrap();
        assert!(builder.build_equality().unwrap().equals(&account(1, "a"), &account(3, "b")));
        let order = builder.build_order().unwrap();
        assert_eq!(order.compare(&account(1, "a"), &account(3, "a")), Ordering::Less);
    }

    #[test]
    fn rule_captures_call_site() {
        let builder = ComparerBuilder::<Account>::new()
            .rule(|r| r.key(|a: &Account| a.id).natural().printable())
            .unwrap();
        let checked = builder.build_checked_order().unwrap();
        let err = checked
            .assert_equivalent(&account(1, "a"), &account(2, "a"))
            .unwrap_err();
        let ComparerError::InvariantViolation(violation) = err else {
            panic!("expected a violation");
        };
        let rule = violation.rule().unwrap();
        assert!(!rule.source().is_unknown());
        assert!(rule.source().file().ends_with("builder.rs"));
    }

    #[test]
    fn combine_with_empty_side_returns_other() {
        let hook: Arc<dyn Interceptor> = Arc::new(PassThrough);
        let right = ComparerBuilder::<Account>::new()
            .add(|a: &Account| a.id)
            .with_interceptor(Arc::clone(&hook));
        let combined = ComparerBuilder::new().combine(right.clone());
        assert_eq!(combined.len(), 1);
        assert!(Arc::ptr_eq(combined.interceptor().unwrap(), &hook));

        let combined = right.combine(ComparerBuilder::new());
        assert!(combined.interceptor().is_some());
    }

    #[test]
    fn combine_keeps_left_interceptor() {
        let left_hook: Arc<dyn Interceptor> = Arc::new(PassThrough);
        let left = ComparerBuilder::<Account>::new()
            .add(|a: &Account| a.id)
            .with_interceptor(Arc::clone(&left_hook));
        let right = ComparerBuilder::<Account>::new()
            .add_field(|a: &Account| &a.owner)
            .with_interceptor(Arc::new(PassThrough));
        let combined = left.combine(right);
        assert_eq!(combined.len(), 2);
        assert!(Arc::ptr_eq(combined.interceptor().unwrap(), &left_hook));
    }

    #[test]
    fn with_same_interceptor_is_noop() {
        let hook: Arc<dyn Interceptor> = Arc::new(PassThrough);
        let builder = ComparerBuilder::<u8>::new()
            .add(|v: &u8| *v)
            .with_interceptor(Arc::clone(&hook))
            .with_interceptor(Arc::clone(&hook));
        assert!(Arc::ptr_eq(builder.interceptor().unwrap(), &hook));
        assert!(builder.without_interceptor().interceptor().is_none());
    }

    #[test]
    fn add_with_custom_capability() {
        let eq = ComparerBuilder::<Account>::new()
            .add_with(|a: &Account| &a.owner, AsciiCaseInsensitive)
            .build_equality()
            .unwrap();
        assert!(eq.equals(&account(1, "Ada"), &account(2, "ADA")));
        assert_eq!(eq.hash(&account(1, "Ada")), eq.hash(&account(2, "aDa")));
    }

    #[test]
    fn optional_members_sort_absent_first() {
        let order = ComparerBuilder::<Account>::new()
            .add_optional(|a: &Account| a.alias.as_ref())
            .build_order()
            .unwrap();
        let mut named = account(1, "a");
        named.alias = Some("z".into());
        assert_eq!(order.compare(&account(2, "b"), &named), Ordering::Less);
        assert_eq!(order.compare(&account(2, "b"), &account(3, "c")), Ordering::Equal);
    }

    #[test]
    fn nested_child_is_reusable() {
        let by_owner = ComparerBuilder::<String>::new().add_with(|s: &String| s, AsciiCaseInsensitive);
        let first = ComparerBuilder::<Account>::new()
            .add_nested(|a: &Account| &a.owner, by_owner.clone())
            .build_equality()
            .unwrap();
        let second = ComparerBuilder::<Account>::new()
            .add(|a: &Account| a.id)
            .add_nested(|a: &Account| &a.owner, by_owner)
            .build_equality()
            .unwrap();
        assert!(first.equals(&account(1, "x"), &account(2, "X")));
        assert!(!second.equals(&account(1, "x"), &account(2, "X")));
    }
}
