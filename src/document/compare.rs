//! Total ordering over JSON values
//!
//! Ordering rules:
//! - missing < null < bool < number < string < array < object
//! - same types use natural ordering
//! - arrays and objects compare equal to each other

use std::cmp::Ordering;

use serde_json::Value;

/// Compares two optional JSON values for sorting and range predicates.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_type = type_order(a_val);
            let b_type = type_order(b_val);

            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    if let (Some(ai), Some(bi)) = (a_n.as_i64(), b_n.as_i64()) {
                        return ai.cmp(&bi);
                    }
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_order(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_sorts_first() {
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(1)), None), Ordering::Greater);
    }

    #[test]
    fn test_type_order() {
        assert_eq!(
            compare_values(Some(&json!(true)), Some(&json!(0))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!("a")), Some(&json!(99))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            compare_values(Some(&json!(9)), Some(&json!(12))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(2.5)), Some(&json!(2))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&json!(i64::MAX)), Some(&json!(i64::MAX - 1))),
            Ordering::Greater
        );
    }
}
