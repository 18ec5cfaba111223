/// Projection from a compared object to one of its members.
///
/// Accessors must be pure: they are called once per operand on every
/// evaluation and their results are never cached.
pub(crate) enum Accessor<T: ?Sized, V> {
    /// A computed, owned value.
    Key(Box<dyn Fn(&T) -> V + Send + Sync>),
    /// A borrowed member that is always present.
    Field(Box<dyn for<'a> Fn(&'a T) -> &'a V + Send + Sync>),
    /// A borrowed member that may be absent.
    Optional(Box<dyn for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync>),
}

/// The result of applying an [`Accessor`] to one operand.
pub(crate) enum Projected<'a, V> {
    Owned(V),
    Borrowed(&'a V),
    Absent,
}

impl<V> Projected<'_, V> {
    pub(crate) fn get(&self) -> Option<&V> {
        match self {
            Projected::Owned(value) => Some(value),
            Projected::Borrowed(value) => Some(*value),
            Projected::Absent => None,
        }
    }
}

impl<T: ?Sized, V> Accessor<T, V> {
    pub(crate) fn key<F>(f: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Accessor::Key(Box::new(f))
    }

    pub(crate) fn field<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        Accessor::Field(Box::new(f))
    }

    pub(crate) fn optional<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
    {
        Accessor::Optional(Box::new(f))
    }

    pub(crate) fn project<'a>(&self, obj: &'a T) -> Projected<'a, V> {
        match self {
            Accessor::Key(f) => Projected::Owned(f(obj)),
            Accessor::Field(f) => Projected::Borrowed(f(obj)),
            Accessor::Optional(f) => f(obj).map_or(Projected::Absent, Projected::Borrowed),
        }
    }

    /// Whether projected values can be absent, i.e. behave like nullable
    /// references with identity and null short-circuits.
    pub(crate) fn is_nullable(&self) -> bool {
        matches!(self, Accessor::Optional(_))
    }
}
