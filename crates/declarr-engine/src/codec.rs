//! Scalar codec between dynamic wire payloads and typed field values.

use std::collections::BTreeSet;

use serde_json::Value;
use snafu::{Snafu, ensure};

use crate::{
    schema::{FieldKind, FieldSpec},
    value::FieldValue,
    wire::DynamicField,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display(
        "field {field:?} carries a {found} payload which cannot be read as {expected}"
    ))]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: JsonType,
    },

    #[snafu(display("field {field:?} holds a {found} value, its schema declares {expected}"))]
    DeclaredKindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },
}

/// Coarse type of a JSON payload, for error reporting only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum JsonType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl From<&Value> for JsonType {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// Decodes one dynamic field against its declared kind.
///
/// An absent payload decodes to the kind's zero value, because the remote
/// service omits fields it considers default. A payload that cannot be
/// represented in the declared kind fails with [`Error::KindMismatch`],
/// never a silent coercion: a string is not an integer, and a fractional
/// number is not an `Int64`.
pub fn decode(field: &DynamicField, kind: FieldKind) -> Result<FieldValue> {
    let Some(value) = &field.value else {
        return Ok(FieldValue::zero(kind));
    };

    decode_value(value, kind).ok_or_else(|| {
        KindMismatchSnafu {
            field: field.name.as_str(),
            expected: kind,
            found: JsonType::from(value),
        }
        .build()
    })
}

fn decode_value(value: &Value, kind: FieldKind) -> Option<FieldValue> {
    let decoded = match kind {
        FieldKind::Bool => FieldValue::Bool(value.as_bool()?),
        FieldKind::Int64 => FieldValue::Int(value.as_i64()?),
        FieldKind::Float64 => FieldValue::Float(value.as_f64()?),
        FieldKind::String => FieldValue::String(value.as_str()?.to_owned()),
        FieldKind::StringSet => FieldValue::StringSet(
            value
                .as_array()?
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<BTreeSet<_>>>()?,
        ),
        FieldKind::IntSet => FieldValue::IntSet(
            value
                .as_array()?
                .iter()
                .map(Value::as_i64)
                .collect::<Option<BTreeSet<_>>>()?,
        ),
    };

    Some(decoded)
}

/// Encodes one typed value into an explicit dynamic field.
///
/// Zero values are encoded explicitly rather than omitted, so the remote
/// service can distinguish "configured to the default" from "not sent".
/// The value must match the kind its spec declares.
pub fn encode(spec: &FieldSpec, value: &FieldValue) -> Result<DynamicField> {
    ensure!(
        value.kind() == spec.kind,
        DeclaredKindMismatchSnafu {
            field: spec.name,
            expected: spec.kind,
            found: value.kind(),
        }
    );

    let payload = match value {
        FieldValue::Bool(b) => Value::from(*b),
        FieldValue::Int(i) => Value::from(*i),
        FieldValue::Float(f) => Value::from(*f),
        FieldValue::String(s) => Value::from(s.as_str()),
        FieldValue::StringSet(set) => Value::from(set.iter().cloned().collect::<Vec<_>>()),
        FieldValue::IntSet(set) => Value::from(set.iter().copied().collect::<Vec<_>>()),
    };

    Ok(DynamicField::new(spec.name, payload))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(true), FieldKind::Bool, FieldValue::Bool(true))]
    #[case(json!(42), FieldKind::Int64, FieldValue::Int(42))]
    #[case(json!(42), FieldKind::Float64, FieldValue::Float(42.0))]
    #[case(json!(0.5), FieldKind::Float64, FieldValue::Float(0.5))]
    #[case(json!("k"), FieldKind::String, FieldValue::from("k"))]
    #[case(json!(["b", "a", "b"]), FieldKind::StringSet, FieldValue::string_set(["a", "b"]))]
    #[case(json!([3, 1, 2, 2]), FieldKind::IntSet, FieldValue::int_set([1, 2, 3]))]
    fn decode_pass(#[case] payload: Value, #[case] kind: FieldKind, #[case] expected: FieldValue) {
        let field = DynamicField::new("f", payload);
        assert_eq!(decode(&field, kind).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("5"), FieldKind::Int64, JsonType::String)]
    #[case(json!(1.5), FieldKind::Int64, JsonType::Number)]
    #[case(json!(1), FieldKind::Bool, JsonType::Number)]
    #[case(json!(true), FieldKind::String, JsonType::Bool)]
    #[case(json!(["a", 1]), FieldKind::StringSet, JsonType::Array)]
    #[case(json!({"a": 1}), FieldKind::IntSet, JsonType::Object)]
    fn decode_mismatch(#[case] payload: Value, #[case] kind: FieldKind, #[case] found: JsonType) {
        let field = DynamicField::new("f", payload);
        assert_eq!(
            decode(&field, kind).unwrap_err(),
            Error::KindMismatch {
                field: "f".to_owned(),
                expected: kind,
                found,
            }
        );
    }

    #[rstest]
    #[case(FieldKind::Bool, FieldValue::Bool(false))]
    #[case(FieldKind::Int64, FieldValue::Int(0))]
    #[case(FieldKind::String, FieldValue::String(String::new()))]
    #[case(FieldKind::IntSet, FieldValue::int_set([]))]
    fn absent_payload_decodes_to_zero(#[case] kind: FieldKind, #[case] expected: FieldValue) {
        assert_eq!(decode(&DynamicField::absent("f"), kind).unwrap(), expected);
    }

    #[test]
    fn encode_emits_explicit_zero() {
        let spec = FieldSpec::new("minimumSeeders", FieldKind::Int64);
        let field = encode(&spec, &FieldValue::Int(0)).unwrap();
        assert_eq!(field, DynamicField::new("minimumSeeders", json!(0)));
    }

    #[test]
    fn encode_rejects_wrong_kind() {
        let spec = FieldSpec::new("apiKey", FieldKind::String);
        let err = encode(&spec, &FieldValue::Int(5)).unwrap_err();
        assert_eq!(
            err,
            Error::DeclaredKindMismatch {
                field: "apiKey".to_owned(),
                expected: FieldKind::String,
                found: FieldKind::Int64,
            }
        );
    }

    #[test]
    fn roundtrip_preserves_value() {
        let spec = FieldSpec::new("categories", FieldKind::IntSet);
        let value = FieldValue::int_set([5030, 5040]);
        let encoded = encode(&spec, &value).unwrap();
        assert_eq!(decode(&encoded, spec.kind).unwrap(), value);
    }
}
