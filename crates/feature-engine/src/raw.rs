//! Raw attribute access with numeric coercion

use crate::error::EncodeError;
use crate::schema::FieldKey;
use serde_json::Value;
use std::collections::BTreeMap;

/// Semi-structured input record as received from a JSON or form body
pub type RawRecord = BTreeMap<String, Value>;

/// Look up a field by its canonical name, then by each alias in turn
pub(crate) fn lookup<'a>(record: &'a RawRecord, key: &FieldKey) -> Result<&'a Value, EncodeError> {
    key.accepted()
        .find_map(|name| record.get(name))
        .ok_or(EncodeError::MissingField(key.name))
}

/// Read an integer field.
///
/// Floats are truncated toward zero, booleans count as 0/1 and strings
/// are parsed after trimming whitespace.
pub(crate) fn read_int(record: &RawRecord, key: &FieldKey) -> Result<i64, EncodeError> {
    let value = lookup(record, key)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| conversion_error(key, value))
}

/// Read a float field; non-finite values are rejected
pub(crate) fn read_float(record: &RawRecord, key: &FieldKey) -> Result<f64, EncodeError> {
    let value = lookup(record, key)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| conversion_error(key, value))
}

/// Read a categorical field as text.
///
/// Only presence is required. Non-string values keep their JSON rendering
/// and therefore match no category.
pub(crate) fn read_category(record: &RawRecord, key: &FieldKey) -> Result<String, EncodeError> {
    let value = lookup(record, key)?;
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn conversion_error(key: &FieldKey, value: &Value) -> EncodeError {
    EncodeError::TypeConversion {
        field: key.name,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: FieldKey = FieldKey::new("credit_score", &["CreditScore"]);

    fn record(value: Value) -> RawRecord {
        let mut raw = RawRecord::new();
        raw.insert("credit_score".to_string(), value);
        raw
    }

    #[test]
    fn test_alias_lookup() {
        let mut raw = RawRecord::new();
        raw.insert("CreditScore".to_string(), json!(700));
        assert_eq!(read_int(&raw, &KEY).unwrap(), 700);
    }

    #[test]
    fn test_later_alias_lookup() {
        const CARD: FieldKey = FieldKey::new("has_credit_card", &["HasCrCard", "has_cr_card"]);
        let mut raw = RawRecord::new();
        raw.insert("has_cr_card".to_string(), json!(1));
        assert_eq!(read_int(&raw, &CARD).unwrap(), 1);
        assert_eq!(
            read_int(&RawRecord::new(), &CARD),
            Err(EncodeError::MissingField("has_credit_card"))
        );
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        let mut raw = record(json!(650));
        raw.insert("CreditScore".to_string(), json!(700));
        assert_eq!(read_int(&raw, &KEY).unwrap(), 650);
    }

    #[test]
    fn test_missing_field() {
        let raw = RawRecord::new();
        assert_eq!(read_int(&raw, &KEY), Err(EncodeError::MissingField("credit_score")));
        assert_eq!(read_category(&raw, &KEY), Err(EncodeError::MissingField("credit_score")));
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(read_int(&record(json!("  42 ")), &KEY).unwrap(), 42);
        assert_eq!(read_int(&record(json!(3.9)), &KEY).unwrap(), 3);
        assert_eq!(read_int(&record(json!(-3.9)), &KEY).unwrap(), -3);
        assert_eq!(read_int(&record(json!(true)), &KEY).unwrap(), 1);
    }

    #[test]
    fn test_int_rejections() {
        for bad in [json!("abc"), json!(""), json!("4.5"), json!(null), json!([1]), json!({})] {
            match read_int(&record(bad), &KEY) {
                Err(EncodeError::TypeConversion { field, .. }) => assert_eq!(field, "credit_score"),
                other => panic!("expected conversion error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(read_float(&record(json!("10000.5")), &KEY).unwrap(), 10000.5);
        assert_eq!(read_float(&record(json!(7)), &KEY).unwrap(), 7.0);
        assert!(read_float(&record(json!("NaN")), &KEY).is_err());
        assert!(read_float(&record(json!("inf")), &KEY).is_err());
        assert!(read_float(&record(json!("ten")), &KEY).is_err());
    }

    #[test]
    fn test_category_rendering() {
        assert_eq!(read_category(&record(json!("GOLD")), &KEY).unwrap(), "GOLD");
        assert_eq!(read_category(&record(json!(1)), &KEY).unwrap(), "1");
        assert_eq!(read_category(&record(json!(null)), &KEY).unwrap(), "");
    }
}
