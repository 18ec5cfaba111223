use std::fmt;

use thiserror::Error;

use super::rule::RuleInfo;
use super::source::SourceTag;

/// The capability a rule was asked to provide during synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Equality,
    Order,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Equality => write!(f, "equality"),
            Capability::Order => write!(f, "order"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ComparerError {
    #[error("no rules defined for '{compared_type}'; at least one rule is required")]
    EmptyBuilder { compared_type: &'static str },

    #[error("invalid rule #{position} at {location}: {reason}")]
    InvalidRule {
        position: usize,
        location: SourceTag,
        reason: &'static str,
    },

    #[error(
        "rule #{position} at {location} has no {capability} capability for '{value_type}' \
         (comparing '{compared_type}')"
    )]
    UnsupportedCapability {
        position: usize,
        location: SourceTag,
        compared_type: &'static str,
        value_type: &'static str,
        capability: Capability,
    },

    #[error("{0}")]
    InvariantViolation(Box<InvariantViolation>),
}

/// A checked comparer's post-condition did not hold.
///
/// Carries the Debug forms of both operands and, when a single rule can be
/// blamed, that rule and the member values it projected.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    expected: &'static str,
    left: String,
    right: String,
    culprit: Option<Culprit>,
}

#[derive(Debug, Clone)]
struct Culprit {
    rule: RuleInfo,
    left: String,
    right: String,
}

impl InvariantViolation {
    pub(crate) fn new(expected: &'static str, left: String, right: String) -> Self {
        Self {
            expected,
            left,
            right,
            culprit: None,
        }
    }

    pub(crate) fn blame(mut self, rule: RuleInfo, left: String, right: String) -> Self {
        self.culprit = Some(Culprit { rule, left, right });
        self
    }

    /// The post-condition that failed, e.g. `"equal"`.
    #[must_use]
    pub fn expected(&self) -> &str {
        self.expected
    }

    /// Debug form of the left operand.
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Debug form of the right operand.
    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }

    /// The first rule whose result broke the post-condition.
    #[must_use]
    pub fn rule(&self) -> Option<&RuleInfo> {
        self.culprit.as_ref().map(|c| &c.rule)
    }

    /// The member values the blamed rule projected from each operand.
    #[must_use]
    pub fn members(&self) -> Option<(&str, &str)> {
        self.culprit
            .as_ref()
            .map(|c| (c.left.as_str(), c.right.as_str()))
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} and {} to be {}",
            self.left, self.right, self.expected
        )?;
        if let Some(culprit) = &self.culprit {
            write!(
                f,
                "; {} saw {} vs {}",
                culprit.rule, culprit.left, culprit.right
            )?;
        }
        Ok(())
    }
}

impl From<InvariantViolation> for ComparerError {
    fn from(violation: InvariantViolation) -> Self {
        ComparerError::InvariantViolation(Box::new(violation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rule::{RuleKind, RuleMeta};
    use crate::synthesize::Scope;

    #[test]
    fn empty_builder_message() {
        let err = ComparerError::EmptyBuilder {
            compared_type: "app::Order",
        };
        assert_eq!(
            err.to_string(),
            "no rules defined for 'app::Order'; at least one rule is required"
        );
    }

    #[test]
    fn invalid_rule_message() {
        let err = ComparerError::InvalidRule {
            position: 2,
            location: SourceTag::new("src/model.rs", 10),
            reason: "no accessor was set",
        };
        assert_eq!(
            err.to_string(),
            "invalid rule #2 at src/model.rs (10): no accessor was set"
        );
    }

    #[test]
    fn unsupported_capability_message() {
        let err = ComparerError::UnsupportedCapability {
            position: 0,
            location: SourceTag::new("src/model.rs", 3),
            compared_type: "app::Order",
            value_type: "f64",
            capability: Capability::Order,
        };
        assert_eq!(
            err.to_string(),
            "rule #0 at src/model.rs (3) has no order capability for 'f64' (comparing 'app::Order')"
        );
    }

    #[test]
    fn violation_message_without_rule() {
        let err: ComparerError =
            InvariantViolation::new("equal", "A { x: 1 }".into(), "A { x: 2 }".into()).into();
        assert_eq!(
            err.to_string(),
            "expected A { x: 1 } and A { x: 2 } to be equal"
        );
    }

    #[test]
    fn violation_message_names_rule_and_members() {
        let meta = RuleMeta::new(
            Some("x".into()),
            SourceTag::new("src/a.rs", 5),
            "i32",
            RuleKind::Leaf,
        );
        let scope = Scope {
            compared_type: "A",
            position: 0,
            interceptor: None,
        };
        let violation = InvariantViolation::new("equal", "A { x: 1 }".into(), "A { x: 2 }".into())
            .blame(meta.at(&scope), "1".into(), "2".into());
        assert_eq!(violation.members(), Some(("1", "2")));
        assert_eq!(violation.rule().map(RuleInfo::position), Some(0));
        assert_eq!(
            violation.to_string(),
            "expected A { x: 1 } and A { x: 2 } to be equal; rule 'x' at src/a.rs (5) saw 1 vs 2"
        );
    }
}
