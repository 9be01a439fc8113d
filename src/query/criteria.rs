//! # Filter Criteria
//!
//! An ordered mapping of field → constraint, AND-combined. Parsed from the
//! document-store filter syntax:
//!
//! ```text
//! {"status": "active", "age": {"$gte": 18, "$lt": 65}, "tag": {"$in": ["a", "b"]}}
//! ```

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::document::{compare_values, Document};
use crate::error::{StoreError, StoreResult};

/// A single field constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Equal to
    Eq(Value),
    /// Not equal to
    Ne(Value),
    /// Greater than
    Gt(Value),
    /// Greater than or equal
    Gte(Value),
    /// Less than
    Lt(Value),
    /// Less than or equal
    Lte(Value),
    /// Value in list
    In(Vec<Value>),
    /// Several operators on one field, all must hold
    All(Vec<Constraint>),
}

impl Constraint {
    /// Parses the value side of a filter entry.
    ///
    /// An object whose keys all start with `$` is an operator expression;
    /// any other value is an equality match.
    pub fn parse(value: &Value) -> StoreResult<Self> {
        let ops = match value {
            Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => map,
            other => return Ok(Self::Eq(other.clone())),
        };

        let mut parsed = Vec::with_capacity(ops.len());
        for (op, operand) in ops {
            parsed.push(match op.as_str() {
                "$eq" => Self::Eq(operand.clone()),
                "$ne" => Self::Ne(operand.clone()),
                "$gt" => Self::Gt(operand.clone()),
                "$gte" => Self::Gte(operand.clone()),
                "$lt" => Self::Lt(operand.clone()),
                "$lte" => Self::Lte(operand.clone()),
                "$in" => match operand {
                    Value::Array(items) => Self::In(items.clone()),
                    _ => {
                        return Err(StoreError::query_build(format!(
                            "$in requires an array, got {}",
                            operand
                        )))
                    }
                },
                unknown => {
                    return Err(StoreError::query_build(format!(
                        "Unknown filter operator: {}",
                        unknown
                    )))
                }
            });
        }

        if parsed.len() == 1 {
            Ok(parsed.remove(0))
        } else {
            Ok(Self::All(parsed))
        }
    }

    /// Checks a field value against this constraint.
    ///
    /// A missing field only satisfies `Ne` and `Eq(null)`.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        match self {
            Self::Eq(expected) => match actual {
                Some(v) => v == expected,
                None => expected.is_null(),
            },
            Self::Ne(expected) => !Self::Eq(expected.clone()).matches(actual),
            Self::Gt(bound) => range_match(actual, bound, |o| o == Ordering::Greater),
            Self::Gte(bound) => range_match(actual, bound, |o| o != Ordering::Less),
            Self::Lt(bound) => range_match(actual, bound, |o| o == Ordering::Less),
            Self::Lte(bound) => range_match(actual, bound, |o| o != Ordering::Greater),
            Self::In(items) => actual.map_or(false, |v| items.contains(v)),
            Self::All(constraints) => constraints.iter().all(|c| c.matches(actual)),
        }
    }

    /// Renders back into filter syntax
    pub fn to_value(&self) -> Value {
        let single = |op: &str, v: &Value| {
            let mut map = Map::new();
            map.insert(op.to_string(), v.clone());
            Value::Object(map)
        };
        match self {
            Self::Eq(v) => v.clone(),
            Self::Ne(v) => single("$ne", v),
            Self::Gt(v) => single("$gt", v),
            Self::Gte(v) => single("$gte", v),
            Self::Lt(v) => single("$lt", v),
            Self::Lte(v) => single("$lte", v),
            Self::In(items) => single("$in", &Value::Array(items.clone())),
            Self::All(constraints) => {
                let mut map = Map::new();
                for c in constraints {
                    match c.to_value() {
                        Value::Object(inner) => map.extend(inner),
                        eq => {
                            map.insert("$eq".to_string(), eq);
                        }
                    }
                }
                Value::Object(map)
            }
        }
    }
}

/// Range comparisons only hold between values of the same JSON type.
fn range_match(actual: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    match actual {
        Some(v) if same_kind(v, bound) => accept(compare_values(Some(v), Some(bound))),
        _ => false,
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Bool(_), Value::Bool(_))
    )
}

/// Filter criteria, AND-combined in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Constraint)>,
}

impl Criteria {
    /// Match-all criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON filter object
    pub fn from_value(value: &Value) -> StoreResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(StoreError::query_build(format!(
                    "Filter must be an object, got {}",
                    other
                )))
            }
        };

        let mut criteria = Self::new();
        for (field, raw) in map {
            if field.starts_with('$') {
                return Err(StoreError::query_build(format!(
                    "Unsupported top-level operator: {}",
                    field
                )));
            }
            criteria.set(field.clone(), Constraint::parse(raw)?);
        }
        Ok(criteria)
    }

    /// Sets the constraint on a field, replacing any existing one in place
    pub fn set(&mut self, field: impl Into<String>, constraint: Constraint) {
        let field = field.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = constraint,
            None => self.entries.push((field, constraint)),
        }
    }

    /// Builder form of [`Criteria::set`]
    pub fn with(mut self, field: impl Into<String>, constraint: Constraint) -> Self {
        self.set(field, constraint);
        self
    }

    /// Equality shorthand
    pub fn eq(self, field: impl Into<String>, value: Value) -> Self {
        self.with(field, Constraint::Eq(value))
    }

    /// Returns the constraint on a field
    pub fn get(&self, field: &str) -> Option<&Constraint> {
        self.entries.iter().find(|(f, _)| f == field).map(|(_, c)| c)
    }

    /// True when no constraint is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of constrained fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over (field, constraint) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), c))
    }

    /// Checks whether a document satisfies every constraint
    pub fn matches(&self, doc: &Document) -> bool {
        self.entries
            .iter()
            .all(|(field, constraint)| constraint.matches(doc.get(field)))
    }

    /// Renders back into filter syntax
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(f, c)| (f.clone(), c.to_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::into_document;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        into_document(v).unwrap()
    }

    #[test]
    fn test_parse_equality_and_operators() {
        let criteria =
            Criteria::from_value(&json!({"name": "Alice", "age": {"$gte": 18, "$lt": 65}}))
                .unwrap();

        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria.get("name"), Some(&Constraint::Eq(json!("Alice"))));
        assert!(matches!(criteria.get("age"), Some(Constraint::All(c)) if c.len() == 2));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = Criteria::from_value(&json!({"age": {"$near": 1}})).unwrap_err();
        assert!(matches!(err, StoreError::QueryBuild(_)));

        let err = Criteria::from_value(&json!({"$where": "1"})).unwrap_err();
        assert!(matches!(err, StoreError::QueryBuild(_)));

        let err = Criteria::from_value(&json!([1])).unwrap_err();
        assert!(matches!(err, StoreError::QueryBuild(_)));
    }

    #[test]
    fn test_null_filter_is_match_all() {
        assert!(Criteria::from_value(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut criteria = Criteria::new()
            .eq("_id", json!(1))
            .eq("name", json!("x"));
        criteria.set("_id", Constraint::Gte(json!(7)));

        let fields: Vec<&str> = criteria.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["_id", "name"]);
        assert_eq!(criteria.get("_id"), Some(&Constraint::Gte(json!(7))));
    }

    #[test]
    fn test_range_matching() {
        let criteria = Criteria::new().with("id", Constraint::Gte(json!(7)));

        assert!(criteria.matches(&doc(json!({"id": 7}))));
        assert!(criteria.matches(&doc(json!({"id": 12}))));
        assert!(!criteria.matches(&doc(json!({"id": 6}))));
        assert!(!criteria.matches(&doc(json!({"id": "7"}))));
        assert!(!criteria.matches(&doc(json!({"other": 7}))));
    }

    #[test]
    fn test_string_ranges() {
        let criteria = Criteria::new().with("_id", Constraint::Gte(json!("65f1")));
        assert!(criteria.matches(&doc(json!({"_id": "65f2"}))));
        assert!(!criteria.matches(&doc(json!({"_id": "65f0"}))));
    }

    #[test]
    fn test_in_and_ne() {
        let criteria = Criteria::from_value(&json!({
            "status": {"$in": ["active", "pending"]},
            "role": {"$ne": "admin"}
        }))
        .unwrap();

        assert!(criteria.matches(&doc(json!({"status": "active", "role": "user"}))));
        assert!(criteria.matches(&doc(json!({"status": "pending"}))));
        assert!(!criteria.matches(&doc(json!({"status": "active", "role": "admin"}))));
        assert!(!criteria.matches(&doc(json!({"status": "done"}))));
    }

    #[test]
    fn test_in_requires_array() {
        let err = Criteria::from_value(&json!({"s": {"$in": "a"}})).unwrap_err();
        assert!(err.to_string().contains("$in"));
    }

    #[test]
    fn test_to_value() {
        let value = json!({"name": "Alice", "age": {"$gte": 18}});
        let criteria = Criteria::from_value(&value).unwrap();
        assert_eq!(criteria.to_value(), value);
    }
}
