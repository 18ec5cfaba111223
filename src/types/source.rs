use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Caller location attached to a rule for diagnostics.
///
/// The tag is opaque: it is echoed back to interceptors and embedded in
/// error messages, never parsed. Builder methods capture their call site
/// through `#[track_caller]`; [`RuleBuilder::source`](crate::RuleBuilder::source)
/// overrides it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceTag {
    file: Cow<'static, str>,
    line: u32,
}

impl SourceTag {
    #[must_use]
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of the caller of the function this is invoked from,
    /// when that function is `#[track_caller]`.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }

    /// A tag carrying no location.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(""),
            line: 0,
        }
    }

    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{} ({})", self.file, self.line)
        }
    }
}
