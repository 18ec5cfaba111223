use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use comparo::{
    Capability, ComparerBuilder, ComparerError, EqualityCapability, OrderCapability, SourceTag,
    equality_by, order_by,
};

#[derive(Debug, Clone)]
struct Node {
    id: u32,
    label: String,
    child: Option<Box<Node>>,
}

fn leaf(id: u32, label: &str) -> Node {
    Node {
        id,
        label: label.into(),
        child: None,
    }
}

#[test]
fn empty_builder_fails_to_build() {
    let builder = ComparerBuilder::<Node>::new();
    let err = builder.build_equality().unwrap_err();
    assert!(matches!(err, ComparerError::EmptyBuilder { .. }));
    assert!(err.to_string().contains("edge_cases::Node"));
    assert!(builder.build_order().is_err());
    assert!(builder.build_checked_equality().is_err());
}

#[test]
fn combining_two_empty_builders_is_still_empty() {
    let combined = ComparerBuilder::<Node>::new().combine(ComparerBuilder::new());
    assert!(combined.is_empty());
    assert!(combined.build_equality().is_err());
}

#[test]
fn unsupported_capability_names_rule() {
    let builder = ComparerBuilder::<Node>::new()
        .add(|n: &Node| n.id)
        .rule(|r| {
            r.field(|n: &Node| &n.label)
                .natural_order()
                .source(SourceTag::new("model.rs", 40))
        })
        .unwrap();

    assert!(builder.build_order().is_ok());
    let err = builder.build_equality().unwrap_err();
    assert_eq!(
        err.to_string(),
        "rule #1 at model.rs (40) has no equality capability for 'alloc::string::String' \
         (comparing 'edge_cases::Node')"
    );
    assert!(matches!(
        err,
        ComparerError::UnsupportedCapability {
            capability: Capability::Equality,
            ..
        }
    ));
}

#[test]
fn rule_without_accessor_fails_eagerly() {
    let result = ComparerBuilder::<Node>::new().rule::<u32>(|r| r.natural());
    assert!(matches!(
        result,
        Err(ComparerError::InvalidRule { position: 0, .. })
    ));
}

#[test]
fn recursive_optional_nesting() {
    let inner = ComparerBuilder::<Node>::new().add(|n: &Node| n.id);
    let builder = ComparerBuilder::<Node>::new()
        .add(|n: &Node| n.id)
        .add_nested_optional(|n: &Node| n.child.as_deref(), inner);
    let eq = builder.build_equality().unwrap();
    let order = builder.build_order().unwrap();

    let mut a = leaf(1, "a");
    let mut b = leaf(1, "b");
    assert!(eq.equals(&a, &b));

    a.child = Some(Box::new(leaf(7, "x")));
    assert!(!eq.equals(&a, &b));
    assert_eq!(order.compare(&b, &a), Ordering::Less);

    b.child = Some(Box::new(leaf(7, "y")));
    assert!(eq.equals(&a, &b));
    assert_eq!(eq.hash(&a), eq.hash(&b));
}

#[test]
fn nested_optional_identity_skips_child() {
    struct Holder {
        node: Option<Arc<Node>>,
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let child = ComparerBuilder::<Node>::new()
        .rule(move |r| {
            r.key(|n: &Node| n.id).natural_order().equality(equality_by(
                move |a: &u32, b: &u32| {
                    counter.fetch_add(1, AtomicOrdering::SeqCst);
                    a == b
                },
                |v: &u32| u64::from(*v),
            ))
        })
        .unwrap();
    let eq = ComparerBuilder::<Holder>::new()
        .add_nested_optional(|h: &Holder| h.node.as_deref(), child)
        .build_equality()
        .unwrap();

    let shared = Arc::new(leaf(3, "shared"));
    let x = Holder {
        node: Some(Arc::clone(&shared)),
    };
    let y = Holder {
        node: Some(Arc::clone(&shared)),
    };
    assert!(eq.equals(&x, &y));
    assert_eq!(calls.load(AtomicOrdering::SeqCst), 0);

    let z = Holder {
        node: Some(Arc::new(leaf(3, "other"))),
    };
    assert!(eq.equals(&x, &z));
    assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);

    assert!(eq.equals(&Holder { node: None }, &Holder { node: None }));
    assert!(!eq.equals(&x, &Holder { node: None }));
}

#[test]
fn hash_aggregate_wraps_after_sixty_four_rules() {
    let mut builder = ComparerBuilder::<[u8; 70]>::new();
    for i in 0..70 {
        builder = builder.add(move |bytes: &[u8; 70]| bytes[i]);
    }
    assert_eq!(builder.len(), 70);
    let eq = builder.build_equality().unwrap();

    let mut a = [0_u8; 70];
    let b = a;
    assert!(eq.equals(&a, &b));
    assert_eq!(eq.hash(&a), eq.hash(&b));

    a[65] = 1;
    assert!(!eq.equals(&a, &b));
}

#[test]
fn unsized_compared_type() {
    let eq = ComparerBuilder::<str>::new()
        .add(str::len)
        .add(|s: &str| s.chars().next())
        .build_equality()
        .unwrap();
    assert!(eq.equals("abc", "axe"));
    assert!(!eq.equals("abc", "bcd"));
    assert!(!eq.equals("abc", "ab"));
}

#[test]
fn closure_capabilities_on_floats() {
    let builder = ComparerBuilder::<(f64, &'static str)>::new()
        .rule(|r| {
            r.key(|p: &(f64, &'static str)| p.0)
                .equality(equality_by(|a: &f64, b: &f64| a.to_bits() == b.to_bits(), |a: &f64| a.to_bits()))
                .order(order_by(|a: &f64, b: &f64| a.total_cmp(b)))
                .printable()
        })
        .unwrap();
    let eq = builder.build_equality().unwrap();
    let order = builder.build_order().unwrap();

    assert!(eq.equals(&(f64::NAN, "a"), &(f64::NAN, "b")));
    assert_eq!(order.compare(&(-0.0, "a"), &(0.0, "a")), Ordering::Less);
}

#[test]
fn checked_violation_reports_operands() {
    let checked = ComparerBuilder::<Node>::new()
        .add(|n: &Node| n.id)
        .rule(|r| r.field(|n: &Node| &n.label).natural().printable().label("label"))
        .unwrap()
        .build_checked_equality()
        .unwrap();

    let err = checked
        .assert_equals(&leaf(1, "left"), &leaf(1, "right"))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("label: \"left\""));
    assert!(message.contains("label: \"right\""));
    assert!(message.contains("rule 'label'"));
    assert!(message.ends_with("saw \"left\" vs \"right\""));
}

#[test]
fn widening_preserves_rule_positions() {
    #[derive(Debug)]
    struct Wrapper(Node);

    impl AsRef<Node> for Wrapper {
        fn as_ref(&self) -> &Node {
            &self.0
        }
    }

    let checked = ComparerBuilder::<Node>::new()
        .add(|n: &Node| n.id)
        .add_field(|n: &Node| &n.label)
        .widen::<Wrapper>()
        .build_checked_order()
        .unwrap();

    let err = checked
        .assert_equivalent(&Wrapper(leaf(1, "a")), &Wrapper(leaf(1, "b")))
        .unwrap_err();
    let ComparerError::InvariantViolation(violation) = err else {
        panic!("expected a violation");
    };
    let rule = violation.rule().unwrap();
    assert_eq!(rule.position(), 1);
    assert!(rule.compared_type().ends_with("Wrapper"));
}

#[test]
fn capability_traits_are_object_safe() {
    let eq: Box<dyn EqualityCapability<str>> = Box::new(comparo::AsciiCaseInsensitive);
    let ord: Box<dyn OrderCapability<str>> = Box::new(comparo::Natural);
    assert!(eq.equals("Q", "q"));
    assert_eq!(ord.compare("a", "b"), Ordering::Less);
}
