use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use super::rule::RuleInfo;

/// A projected member value handed to an [`Interceptor`].
///
/// Values whose type was declared printable render through `Debug`; others
/// render as their type name. Absent values of optional members render as
/// `null`.
#[derive(Clone, Copy)]
pub struct Operand<'a> {
    repr: Repr<'a>,
    type_name: &'static str,
}

#[derive(Clone, Copy)]
enum Repr<'a> {
    Printable(&'a dyn fmt::Debug),
    Opaque,
    Null,
}

impl<'a> Operand<'a> {
    #[must_use]
    pub fn printable<V: fmt::Debug>(value: &'a V) -> Self {
        Self {
            repr: Repr::Printable(value),
            type_name: std::any::type_name::<V>(),
        }
    }

    #[must_use]
    pub fn opaque<V: ?Sized>() -> Self {
        Self {
            repr: Repr::Opaque,
            type_name: std::any::type_name::<V>(),
        }
    }

    #[must_use]
    pub fn null<V: ?Sized>() -> Self {
        Self {
            repr: Repr::Null,
            type_name: std::any::type_name::<V>(),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    #[must_use]
    pub fn is_printable(&self) -> bool {
        matches!(self.repr, Repr::Printable(_))
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Printable(value) => write!(f, "{value:?}"),
            Repr::Opaque => write!(f, "<{}>", self.type_name),
            Repr::Null => write!(f, "null"),
        }
    }
}

impl fmt::Debug for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Hook invoked around every leaf rule evaluation.
///
/// Each method receives the raw per-rule result, the projected operands and
/// the rule's metadata, and returns the value the aggregate should use.
/// The provided methods return the raw value unchanged.
///
/// Equality and comparison stop at the first decisive rule, so rules after
/// it are not evaluated and their hooks do not fire for that call. Hashing
/// always evaluates every rule.
pub trait Interceptor: Send + Sync {
    fn intercept_equals(
        &self,
        value: bool,
        _x: Operand<'_>,
        _y: Operand<'_>,
        _rule: &RuleInfo,
    ) -> bool {
        value
    }

    fn intercept_hash(&self, value: u64, _obj: Operand<'_>, _rule: &RuleInfo) -> u64 {
        value
    }

    fn intercept_compare(
        &self,
        value: Ordering,
        _x: Operand<'_>,
        _y: Operand<'_>,
        _rule: &RuleInfo,
    ) -> Ordering {
        value
    }
}

/// The identity interceptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Interceptor for PassThrough {}

/// Logs anomalous per-rule results through `tracing` without altering them.
///
/// Unequal members and nonzero comparisons are logged at `DEBUG`, zero
/// hash contributions at `TRACE`, under the `comparo::intercept` target.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostic {
    log_equality: bool,
    log_zero_hash: bool,
    log_compare: bool,
}

impl Default for Diagnostic {
    fn default() -> Self {
        Self {
            log_equality: true,
            log_zero_hash: true,
            log_compare: true,
        }
    }
}

impl Diagnostic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn log_equality(mut self, enabled: bool) -> Self {
        self.log_equality = enabled;
        self
    }

    #[must_use]
    pub fn log_zero_hash(mut self, enabled: bool) -> Self {
        self.log_zero_hash = enabled;
        self
    }

    #[must_use]
    pub fn log_compare(mut self, enabled: bool) -> Self {
        self.log_compare = enabled;
        self
    }
}

impl Interceptor for Diagnostic {
    fn intercept_equals(&self, value: bool, x: Operand<'_>, y: Operand<'_>, rule: &RuleInfo) -> bool {
        if self.log_equality && !value {
            debug!(
                target: "comparo::intercept",
                compared_type = rule.compared_type(),
                position = rule.position(),
                source = %rule.source(),
                %x,
                %y,
                "{rule}: members are not equal"
            );
        }
        value
    }

    fn intercept_hash(&self, value: u64, obj: Operand<'_>, rule: &RuleInfo) -> u64 {
        if self.log_zero_hash && value == 0 {
            trace!(
                target: "comparo::intercept",
                compared_type = rule.compared_type(),
                position = rule.position(),
                source = %rule.source(),
                %obj,
                "{rule}: member hashed to zero"
            );
        }
        value
    }

    fn intercept_compare(
        &self,
        value: Ordering,
        x: Operand<'_>,
        y: Operand<'_>,
        rule: &RuleInfo,
    ) -> Ordering {
        if self.log_compare && value.is_ne() {
            debug!(
                target: "comparo::intercept",
                compared_type = rule.compared_type(),
                position = rule.position(),
                source = %rule.source(),
                %x,
                %y,
                ordering = ?value,
                "{rule}: members differ"
            );
        }
        value
    }
}
