//! Declarative, member-by-member equality, hashing and ordering.
//!
//! A [`ComparerBuilder`] lists the members of a type that take part in
//! comparison. Building it synthesizes closures for equality, hashing and
//! three-way comparison that can be reused for any number of calls.
//!
//! ```
//! use comparo::{AsciiCaseInsensitive, ComparerBuilder};
//!
//! #[derive(Debug)]
//! struct User {
//!     email: String,
//!     age: u8,
//! }
//!
//! let builder = ComparerBuilder::<User>::new()
//!     .add_with(|u: &User| &u.email, AsciiCaseInsensitive)
//!     .add(|u: &User| u.age);
//!
//! let eq = builder.build_equality().unwrap();
//! let a = User { email: "ada@example.com".into(), age: 36 };
//! let b = User { email: "ADA@example.com".into(), age: 36 };
//! assert!(eq.equals(&a, &b));
//! assert_eq!(eq.hash(&a), eq.hash(&b));
//! ```

mod aggregate;
mod hashing;
mod synthesize;
mod types;

pub use hashing::stable_hash;
pub use types::{
    AsciiCaseInsensitive, Capability, CheckedEqualityComparer, CheckedOrderComparer,
    ComparerBuilder, ComparerError, Descending, Diagnostic, EqualityCapability, EqualityComparer,
    FnEquality, FnOrder, HashKey, Interceptor, InvariantViolation, Natural, Operand,
    OrderCapability, OrderComparer, PassThrough, RuleBuilder, RuleInfo, RuleKind, SortKey,
    SourceTag, equality_by, order_by,
};
