use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::accessor::Accessor;
use super::builder::ComparerBuilder;
use super::capability::{EqualityCapability, OrderCapability};
use super::error::{Capability, ComparerError};
use super::interceptor::Operand;
use super::source::SourceTag;
use crate::aggregate;
use crate::synthesize::{
    CompareFn, EqualityStep, EqualsFn, HashFn, OrderStep, RenderFn, Scope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Compares one projected value with an equality/order capability.
    Leaf,
    /// Delegates to a child builder for the projected value.
    Nested,
}

/// Metadata describing one rule inside one synthesized comparer.
///
/// Passed to every [`Interceptor`](crate::Interceptor) callback and embedded
/// in checked-mode violations.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    position: usize,
    label: Option<Cow<'static, str>>,
    source: SourceTag,
    compared_type: &'static str,
    value_type: &'static str,
    kind: RuleKind,
    custom_equality: bool,
    custom_order: bool,
}

impl RuleInfo {
    /// Zero-based position of the rule in its builder.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> &SourceTag {
        &self.source
    }

    /// Type name of the objects being compared. For a widened builder this is
    /// the derived type.
    #[must_use]
    pub fn compared_type(&self) -> &'static str {
        self.compared_type
    }

    /// Type name of the projected member value.
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Whether equality came from an explicit capability rather than the
    /// natural default.
    #[must_use]
    pub fn custom_equality(&self) -> bool {
        self.custom_equality
    }

    /// Whether ordering came from an explicit capability rather than the
    /// natural default.
    #[must_use]
    pub fn custom_order(&self) -> bool {
        self.custom_order
    }
}

impl fmt::Display for RuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "rule '{label}' at {}", self.source),
            None => write!(
                f,
                "rule #{} ({}) at {}",
                self.position, self.value_type, self.source
            ),
        }
    }
}

/// The synthesis-independent part of a [`RuleInfo`].
#[derive(Debug, Clone)]
pub(crate) struct RuleMeta {
    label: Option<Cow<'static, str>>,
    source: SourceTag,
    value_type: &'static str,
    kind: RuleKind,
    custom_equality: bool,
    custom_order: bool,
}

impl RuleMeta {
    pub(crate) fn new(
        label: Option<Cow<'static, str>>,
        source: SourceTag,
        value_type: &'static str,
        kind: RuleKind,
    ) -> Self {
        Self {
            label,
            source,
            value_type,
            kind,
            custom_equality: false,
            custom_order: false,
        }
    }

    pub(crate) fn customized(mut self, equality: bool, order: bool) -> Self {
        self.custom_equality = equality;
        self.custom_order = order;
        self
    }

    pub(crate) fn at(&self, scope: &Scope) -> RuleInfo {
        RuleInfo {
            position: scope.position,
            label: self.label.clone(),
            source: self.source.clone(),
            compared_type: scope.compared_type,
            value_type: self.value_type,
            kind: self.kind,
            custom_equality: self.custom_equality,
            custom_order: self.custom_order,
        }
    }

    fn unsupported(&self, scope: &Scope, capability: Capability) -> ComparerError {
        ComparerError::UnsupportedCapability {
            position: scope.position,
            location: self.source.clone(),
            compared_type: scope.compared_type,
            value_type: self.value_type,
            capability,
        }
    }
}

/// A rule over `T` with its member type erased.
pub(crate) trait Member<T: ?Sized>: Send + Sync {
    fn equality(&self, scope: &Scope) -> Result<EqualityStep<T>, ComparerError>;
    fn order(&self, scope: &Scope) -> Result<OrderStep<T>, ComparerError>;
}

/// Renders a projected value for interceptors and violations.
pub(crate) type Renderer<V> = for<'a> fn(&'a V) -> Operand<'a>;

pub(crate) fn render_debug<V: fmt::Debug>(value: &V) -> Operand<'_> {
    Operand::printable(value)
}

pub(crate) fn render_opaque<V>(_value: &V) -> Operand<'_> {
    Operand::opaque::<V>()
}

fn operand<'a, V>(render: Renderer<V>, value: Option<&'a V>) -> Operand<'a> {
    match value {
        Some(value) => render(value),
        None => Operand::null::<V>(),
    }
}

pub(crate) struct LeafRule<T: ?Sized, V> {
    accessor: Arc<Accessor<T, V>>,
    equality: Option<Arc<dyn EqualityCapability<V>>>,
    order: Option<Arc<dyn OrderCapability<V>>>,
    render: Renderer<V>,
    meta: RuleMeta,
}

impl<T: ?Sized + 'static, V: 'static> LeafRule<T, V> {
    pub(crate) fn new(
        accessor: Accessor<T, V>,
        equality: Option<Arc<dyn EqualityCapability<V>>>,
        order: Option<Arc<dyn OrderCapability<V>>>,
        render: Renderer<V>,
        meta: RuleMeta,
    ) -> Self {
        Self {
            accessor: Arc::new(accessor),
            equality,
            order,
            render,
            meta,
        }
    }

    fn renderer(&self) -> RenderFn<T> {
        let accessor = Arc::clone(&self.accessor);
        let render = self.render;
        Arc::new(move |obj: &T| {
            let projected = accessor.project(obj);
            operand(render, projected.get()).to_string()
        })
    }
}

impl<T: ?Sized + 'static, V: 'static> Member<T> for LeafRule<T, V> {
    fn equality(&self, scope: &Scope) -> Result<EqualityStep<T>, ComparerError> {
        let capability = self
            .equality
            .clone()
            .ok_or_else(|| self.meta.unsupported(scope, Capability::Equality))?;
        let info = Arc::new(self.meta.at(scope));
        let render = self.render;

        let (equals, hash): (EqualsFn<T>, HashFn<T>) = match scope.interceptor.clone() {
            None => {
                let (accessor, cap) = (Arc::clone(&self.accessor), Arc::clone(&capability));
                let equals: EqualsFn<T> = Arc::new(move |x: &T, y: &T| {
                    let (px, py) = (accessor.project(x), accessor.project(y));
                    aggregate::null_safe_equals(px.get(), py.get(), |a, b| cap.equals(a, b))
                });
                let accessor = Arc::clone(&self.accessor);
                let hash: HashFn<T> = Arc::new(move |obj: &T| {
                    let projected = accessor.project(obj);
                    aggregate::hash_nullable(projected.get(), |v| capability.hash(v))
                });
                (equals, hash)
            }
            Some(interceptor) => {
                let (accessor, cap, hook, rule) = (
                    Arc::clone(&self.accessor),
                    Arc::clone(&capability),
                    Arc::clone(&interceptor),
                    Arc::clone(&info),
                );
                let equals: EqualsFn<T> = Arc::new(move |x: &T, y: &T| {
                    let (px, py) = (accessor.project(x), accessor.project(y));
                    let (a, b) = (px.get(), py.get());
                    let value = aggregate::null_safe_equals(a, b, |a, b| cap.equals(a, b));
                    hook.intercept_equals(value, operand(render, a), operand(render, b), &rule)
                });
                let (accessor, rule) = (Arc::clone(&self.accessor), Arc::clone(&info));
                let hash: HashFn<T> = Arc::new(move |obj: &T| {
                    let projected = accessor.project(obj);
                    let value = projected.get();
                    let code = aggregate::hash_nullable(value, |v| capability.hash(v));
                    interceptor.intercept_hash(code, operand(render, value), &rule)
                });
                (equals, hash)
            }
        };

        Ok(EqualityStep {
            info,
            equals,
            hash,
            render: self.renderer(),
        })
    }

    fn order(&self, scope: &Scope) -> Result<OrderStep<T>, ComparerError> {
        let capability = self
            .order
            .clone()
            .ok_or_else(|| self.meta.unsupported(scope, Capability::Order))?;
        let info = Arc::new(self.meta.at(scope));
        let accessor = Arc::clone(&self.accessor);
        let render = self.render;

        let compare: CompareFn<T> = match scope.interceptor.clone() {
            None => Arc::new(move |x: &T, y: &T| {
                let (px, py) = (accessor.project(x), accessor.project(y));
                aggregate::null_safe_compare(px.get(), py.get(), |a, b| capability.compare(a, b))
            }),
            Some(interceptor) => {
                let rule = Arc::clone(&info);
                Arc::new(move |x: &T, y: &T| {
                    let (px, py) = (accessor.project(x), accessor.project(y));
                    let (a, b) = (px.get(), py.get());
                    let value = aggregate::null_safe_compare(a, b, |a, b| capability.compare(a, b));
                    interceptor.intercept_compare(value, operand(render, a), operand(render, b), &rule)
                })
            }
        };

        Ok(OrderStep {
            info,
            compare,
            render: self.renderer(),
        })
    }
}

/// A rule comparing a projected member with a child builder's comparer.
///
/// The child synthesizes with its own attached interceptor when it has one,
/// otherwise with the interceptor of the enclosing synthesis.
pub(crate) struct NestedRule<T: ?Sized, V> {
    accessor: Arc<Accessor<T, V>>,
    child: ComparerBuilder<V>,
    meta: RuleMeta,
}

impl<T: ?Sized + 'static, V: 'static> NestedRule<T, V> {
    pub(crate) fn new(accessor: Accessor<T, V>, child: ComparerBuilder<V>, source: SourceTag) -> Self {
        Self {
            accessor: Arc::new(accessor),
            child,
            meta: RuleMeta::new(None, source, type_name::<V>(), RuleKind::Nested),
        }
    }

    fn renderer(&self) -> RenderFn<T> {
        let accessor = Arc::clone(&self.accessor);
        Arc::new(move |obj: &T| {
            let projected = accessor.project(obj);
            operand(render_opaque::<V>, projected.get()).to_string()
        })
    }
}

impl<T: ?Sized + 'static, V: 'static> Member<T> for NestedRule<T, V> {
    fn equality(&self, scope: &Scope) -> Result<EqualityStep<T>, ComparerError> {
        let interceptor = self.child.inherit(scope.interceptor.as_ref());
        let plan = self.child.equality_plan(interceptor)?;
        let (child_equals, child_hash) = (plan.equals, plan.hash);
        let reference_like = self.accessor.is_nullable();

        let accessor = Arc::clone(&self.accessor);
        let equals: EqualsFn<T> = Arc::new(move |x: &T, y: &T| {
            let (px, py) = (accessor.project(x), accessor.project(y));
            let equals = |a: &V, b: &V| child_equals(a, b);
            if reference_like {
                aggregate::equals_nullable(px.get(), py.get(), equals)
            } else {
                aggregate::null_safe_equals(px.get(), py.get(), equals)
            }
        });

        let accessor = Arc::clone(&self.accessor);
        let hash: HashFn<T> = Arc::new(move |obj: &T| {
            let projected = accessor.project(obj);
            aggregate::hash_nullable(projected.get(), |v| child_hash(v))
        });

        Ok(EqualityStep {
            info: Arc::new(self.meta.at(scope)),
            equals,
            hash,
            render: self.renderer(),
        })
    }

    fn order(&self, scope: &Scope) -> Result<OrderStep<T>, ComparerError> {
        let interceptor = self.child.inherit(scope.interceptor.as_ref());
        let child_compare = self.child.order_plan(interceptor)?.compare;
        let reference_like = self.accessor.is_nullable();

        let accessor = Arc::clone(&self.accessor);
        let compare: CompareFn<T> = Arc::new(move |x: &T, y: &T| {
            let (px, py) = (accessor.project(x), accessor.project(y));
            let compare = |a: &V, b: &V| child_compare(a, b);
            if reference_like {
                aggregate::compare_nullable(px.get(), py.get(), compare)
            } else {
                aggregate::null_safe_compare(px.get(), py.get(), compare)
            }
        });

        Ok(OrderStep {
            info: Arc::new(self.meta.at(scope)),
            compare,
            render: self.renderer(),
        })
    }
}

/// A rule of `ComparerBuilder<T>` applied to `D` through `AsRef<T>`.
pub(crate) struct Widened<T: ?Sized, D: ?Sized> {
    inner: Arc<dyn Member<T>>,
    _derived: PhantomData<fn(&D)>,
}

impl<T: ?Sized, D: ?Sized> Widened<T, D> {
    pub(crate) fn new(inner: Arc<dyn Member<T>>) -> Self {
        Self {
            inner,
            _derived: PhantomData,
        }
    }
}

fn upcast<T: ?Sized, D: AsRef<T> + ?Sized>(obj: &D) -> &T {
    obj.as_ref()
}

impl<T, D> Member<D> for Widened<T, D>
where
    T: ?Sized + 'static,
    D: AsRef<T> + ?Sized + 'static,
{
    fn equality(&self, scope: &Scope) -> Result<EqualityStep<D>, ComparerError> {
        let EqualityStep {
            info,
            equals,
            hash,
            render,
        } = self.inner.equality(scope)?;
        Ok(EqualityStep {
            info,
            equals: Arc::new(move |x: &D, y: &D| equals(upcast::<T, D>(x), upcast::<T, D>(y))),
            hash: Arc::new(move |obj: &D| hash(upcast::<T, D>(obj))),
            render: Arc::new(move |obj: &D| render(upcast::<T, D>(obj))),
        })
    }

    fn order(&self, scope: &Scope) -> Result<OrderStep<D>, ComparerError> {
        let OrderStep {
            info,
            compare,
            render,
        } = self.inner.order(scope)?;
        Ok(OrderStep {
            info,
            compare: Arc::new(move |x: &D, y: &D| compare(upcast::<T, D>(x), upcast::<T, D>(y))),
            render: Arc::new(move |obj: &D| render(upcast::<T, D>(obj))),
        })
    }
}
