//! Forgiving deserializers for hand-edited or older job files.
//!
//! Numeric fields accept numbers, numeric strings (with `$` and thousands
//! separators), `null` or garbage. Anything that does not parse becomes 0.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::finite_or_zero;

/// Coerces an arbitrary JSON value into a finite number.
pub fn coerce_f64(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_number(text).unwrap_or(0.0),
        _ => 0.0,
    };
    finite_or_zero(raw)
}

/// Parses user-entered numbers such as `"1,250.50"` or `"$980"`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Truthiness for stored flags: booleans, non-zero numbers and `"true"`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_f64).unwrap_or(0.0))
}

/// Truck counts and similar: rounded down, never below one.
pub fn count_at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let count = value.as_ref().map(coerce_f64).unwrap_or(1.0).floor();
    Ok(if count < 1.0 {
        1
    } else {
        count.min(u32::MAX as f64) as u32
    })
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(truthy).unwrap_or(false))
}

/// Free-form text that older files sometimes stored as a number.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

pub fn number_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| (key.clone(), coerce_f64(value)))
        .collect())
}

pub fn flag_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| (key.clone(), truthy(value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_strings_and_garbage() {
        assert_eq!(coerce_f64(&json!(12.5)), 12.5);
        assert_eq!(coerce_f64(&json!("1,250.50")), 1250.5);
        assert_eq!(coerce_f64(&json!("$980")), 980.0);
        assert_eq!(coerce_f64(&json!("abc")), 0.0);
        assert_eq!(coerce_f64(&json!(null)), 0.0);
        assert_eq!(coerce_f64(&json!({"nested": 1})), 0.0);
        assert_eq!(coerce_f64(&json!("NaN")), 0.0);
    }

    #[test]
    fn truthiness_follows_stored_flag_shapes() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("TRUE")));
        assert!(!truthy(&json!("no")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(null)));
    }

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "f64_or_zero")]
        amount: f64,
        #[serde(default = "one", deserialize_with = "count_at_least_one")]
        trucks: u32,
        #[serde(default, deserialize_with = "number_map")]
        markups: BTreeMap<String, f64>,
    }

    fn one() -> u32 {
        1
    }

    #[test]
    fn field_helpers_default_missing_values() {
        let sample: Sample = serde_json::from_str(r#"{"trucks": 0}"#).unwrap();
        assert_eq!(sample.amount, 0.0);
        assert_eq!(sample.trucks, 1);
        assert!(sample.markups.is_empty());

        let sample: Sample =
            serde_json::from_str(r#"{"amount": "15", "trucks": "3.7", "markups": {"a": "10"}}"#)
                .unwrap();
        assert_eq!(sample.amount, 15.0);
        assert_eq!(sample.trucks, 3);
        assert_eq!(sample.markups.get("a"), Some(&10.0));
    }
}
