use std::borrow::Cow;
use std::fmt;

/// A row in one of the dashboard tables, addressed by an opaque key and
/// readable field-by-field for filtering and search.
pub trait Record: Clone + Send + Sync + 'static {
    type Key: Clone + Eq + fmt::Display + Send + Sync + 'static;

    fn key(&self) -> &Self::Key;

    /// Returns `None` when the field is unknown or holds no value.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// A partial update. Fields set on the patch win; everything else is kept.
pub trait Patch<R> {
    fn apply_to(&self, record: &R) -> R;
}

pub const MISSING: &str = "-";

pub fn display_or_missing<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}
