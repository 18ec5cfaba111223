use std::any::type_name;
use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::aggregate;
use crate::types::{ComparerError, Interceptor, Member, RuleInfo};

pub(crate) type EqualsFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;
pub(crate) type HashFn<T> = Arc<dyn Fn(&T) -> u64 + Send + Sync>;
pub(crate) type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;
pub(crate) type RenderFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// What a rule needs to know about the synthesis it takes part in.
#[derive(Clone)]
pub(crate) struct Scope {
    pub(crate) compared_type: &'static str,
    pub(crate) position: usize,
    pub(crate) interceptor: Option<Arc<dyn Interceptor>>,
}

/// One rule's contribution to an equality comparer.
pub(crate) struct EqualityStep<T: ?Sized> {
    pub(crate) info: Arc<RuleInfo>,
    pub(crate) equals: EqualsFn<T>,
    pub(crate) hash: HashFn<T>,
    pub(crate) render: RenderFn<T>,
}

/// One rule's contribution to an order comparer.
pub(crate) struct OrderStep<T: ?Sized> {
    pub(crate) info: Arc<RuleInfo>,
    pub(crate) compare: CompareFn<T>,
    pub(crate) render: RenderFn<T>,
}

pub(crate) struct EqualityPlan<T: ?Sized> {
    pub(crate) steps: Arc<[EqualityStep<T>]>,
    pub(crate) equals: EqualsFn<T>,
    pub(crate) hash: HashFn<T>,
}

pub(crate) struct OrderPlan<T: ?Sized> {
    pub(crate) steps: Arc<[OrderStep<T>]>,
    pub(crate) compare: CompareFn<T>,
}

/// Synthesize equality and hashing over `rules`.
///
/// Both are built from the same step list, so equal objects always hash
/// identically.
pub(crate) fn equality<T: ?Sized + 'static>(
    rules: &[Arc<dyn Member<T>>],
    interceptor: Option<Arc<dyn Interceptor>>,
) -> Result<EqualityPlan<T>, ComparerError> {
    let steps = scopes::<T>(rules.len(), interceptor, "equality")?
        .zip(rules)
        .map(|(scope, rule)| rule.equality(&scope))
        .collect::<Result<Vec<_>, _>>()?;
    let steps: Arc<[EqualityStep<T>]> = steps.into();

    Ok(EqualityPlan {
        equals: aggregate::all_equal(&steps),
        hash: aggregate::rotate_xor(&steps),
        steps,
    })
}

/// Synthesize a three-way comparison over `rules`; the first rule is the
/// primary key.
pub(crate) fn order<T: ?Sized + 'static>(
    rules: &[Arc<dyn Member<T>>],
    interceptor: Option<Arc<dyn Interceptor>>,
) -> Result<OrderPlan<T>, ComparerError> {
    let steps = scopes::<T>(rules.len(), interceptor, "order")?
        .zip(rules)
        .map(|(scope, rule)| rule.order(&scope))
        .collect::<Result<Vec<_>, _>>()?;
    let steps: Arc<[OrderStep<T>]> = steps.into();

    Ok(OrderPlan {
        compare: aggregate::lexicographic(&steps),
        steps,
    })
}

fn scopes<T: ?Sized>(
    len: usize,
    interceptor: Option<Arc<dyn Interceptor>>,
    operation: &'static str,
) -> Result<impl Iterator<Item = Scope>, ComparerError> {
    let compared_type = type_name::<T>();
    if len == 0 {
        return Err(ComparerError::EmptyBuilder { compared_type });
    }

    debug!(
        target: "comparo::synthesize",
        compared_type,
        operation,
        rules = len,
        intercepted = interceptor.is_some(),
        "synthesizing comparer"
    );

    Ok((0..len).map(move |position| Scope {
        compared_type,
        position,
        interceptor: interceptor.clone(),
    }))
}
