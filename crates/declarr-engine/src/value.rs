//! Strongly typed field values.

use std::collections::BTreeSet;

use crate::schema::FieldKind;

/// A decoded, strongly typed field value.
///
/// This is the in-memory counterpart of the dynamic wire payload; there is
/// exactly one variant per [`FieldKind`]. Set variants are semantic sets:
/// ordering and duplicates of the wire sequence are already gone.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    StringSet(BTreeSet<String>),
    IntSet(BTreeSet<i64>),
}

impl FieldValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Int(_) => FieldKind::Int64,
            Self::Float(_) => FieldKind::Float64,
            Self::String(_) => FieldKind::String,
            Self::StringSet(_) => FieldKind::StringSet,
            Self::IntSet(_) => FieldKind::IntSet,
        }
    }

    /// The zero value of a kind, used when the remote service omits a field
    /// it considers to be at its default.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Bool => Self::Bool(false),
            FieldKind::Int64 => Self::Int(0),
            FieldKind::Float64 => Self::Float(0.0),
            FieldKind::String => Self::String(String::new()),
            FieldKind::StringSet => Self::StringSet(BTreeSet::new()),
            FieldKind::IntSet => Self::IntSet(BTreeSet::new()),
        }
    }

    /// Builds a [`FieldValue::StringSet`], collapsing duplicates.
    pub fn string_set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::StringSet(items.into_iter().map(Into::into).collect())
    }

    /// Builds a [`FieldValue::IntSet`], collapsing duplicates.
    pub fn int_set(items: impl IntoIterator<Item = i64>) -> Self {
        Self::IntSet(items.into_iter().collect())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(FieldValue::Bool(true), FieldKind::Bool)]
    #[case(FieldValue::Int(7), FieldKind::Int64)]
    #[case(FieldValue::Float(0.5), FieldKind::Float64)]
    #[case(FieldValue::from("x"), FieldKind::String)]
    #[case(FieldValue::string_set(["a"]), FieldKind::StringSet)]
    #[case(FieldValue::int_set([1]), FieldKind::IntSet)]
    fn kind_matches_variant(#[case] value: FieldValue, #[case] expected: FieldKind) {
        assert_eq!(value.kind(), expected);
    }

    #[rstest]
    #[case(FieldKind::Bool)]
    #[case(FieldKind::Int64)]
    #[case(FieldKind::Float64)]
    #[case(FieldKind::String)]
    #[case(FieldKind::StringSet)]
    #[case(FieldKind::IntSet)]
    fn zero_value_has_its_kind(#[case] kind: FieldKind) {
        assert_eq!(FieldValue::zero(kind).kind(), kind);
    }

    #[test]
    fn set_constructors_collapse_duplicates() {
        assert_eq!(
            FieldValue::int_set([3, 1, 2, 2]),
            FieldValue::int_set([1, 2, 3])
        );
        assert_eq!(
            FieldValue::string_set(["b", "a", "b"]),
            FieldValue::string_set(["a", "b"])
        );
    }
}
