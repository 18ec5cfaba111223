mod accessor;
mod builder;
mod capability;
mod comparer;
mod error;
mod interceptor;
mod rule;
mod source;

pub(crate) use rule::Member;

pub use builder::{ComparerBuilder, RuleBuilder};
pub use capability::{
    AsciiCaseInsensitive, Descending, EqualityCapability, FnEquality, FnOrder, Natural,
    OrderCapability, equality_by, order_by,
};
pub use comparer::{
    CheckedEqualityComparer, CheckedOrderComparer, EqualityComparer, HashKey, OrderComparer,
    SortKey,
};
pub use error::{Capability, ComparerError, InvariantViolation};
pub use interceptor::{Diagnostic, Interceptor, Operand, PassThrough};
pub use rule::{RuleInfo, RuleKind};
pub use source::SourceTag;
