//! Documents and identifiers
//!
//! Documents are plain JSON objects detached from the store. Every stored
//! document carries an identifier under [`ID_FIELD`].

mod compare;
mod object_id;

use serde_json::{Map, Value};

pub use compare::compare_values;
pub use object_id::ObjectId;

/// Default identifier field
pub const ID_FIELD: &str = "_id";

/// A detached document
pub type Document = Map<String, Value>;

/// Truthiness of a JSON value as a cursor or flag.
///
/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts a JSON value into a document.
///
/// Returns `None` if the value is not an object.
pub fn into_document(value: Value) -> Option<Document> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));

        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!("65f0")));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_into_document() {
        assert!(into_document(json!({"a": 1})).is_some());
        assert!(into_document(json!([1, 2])).is_none());
    }
}
