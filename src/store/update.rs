//! Update documents
//!
//! Supported operators: `$set`, `$inc`, `$unset`. A plain object without
//! operators is treated as `$set`.

use serde_json::{Map, Number, Value};

use crate::document::{Document, ID_FIELD};
use crate::error::{StoreError, StoreResult};

/// A parsed update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Map<String, Value>,
    inc: Map<String, Value>,
    unset: Vec<String>,
}

impl Update {
    /// Parses an update document.
    ///
    /// Empty updates are rejected as input errors.
    pub fn from_value(value: &Value) -> StoreResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| StoreError::input(format!("Update must be an object, got {}", value)))?;

        if map.is_empty() {
            return Err(StoreError::input("Update must not be empty"));
        }

        let mut update = Self::default();

        if !map.keys().any(|k| k.starts_with('$')) {
            update.set = map.clone();
        } else {
            for (op, fields) in map {
                let fields = fields.as_object().ok_or_else(|| {
                    StoreError::input(format!("{} requires an object", op))
                })?;
                match op.as_str() {
                    "$set" => update.set.extend(fields.clone()),
                    "$inc" => {
                        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_number()) {
                            return Err(StoreError::input(format!(
                                "$inc on {} requires a number",
                                field
                            )));
                        }
                        update.inc.extend(fields.clone());
                    }
                    "$unset" => update.unset.extend(fields.keys().cloned()),
                    other => {
                        return Err(StoreError::input(format!("Unknown update operator: {}", other)))
                    }
                }
            }
        }

        if update.set.contains_key(ID_FIELD)
            || update.inc.contains_key(ID_FIELD)
            || update.unset.iter().any(|f| f == ID_FIELD)
        {
            return Err(StoreError::input("The identifier field is immutable"));
        }

        Ok(update)
    }

    /// Applies the update to a document
    pub fn apply(&self, doc: &mut Document) -> StoreResult<()> {
        for (field, value) in &self.set {
            doc.insert(field.clone(), value.clone());
        }

        for (field, delta) in &self.inc {
            let next = match doc.get(field) {
                None | Some(Value::Null) => delta.clone(),
                Some(Value::Number(current)) => add_numbers(current, delta)?,
                Some(other) => {
                    return Err(StoreError::operation(format!(
                        "Cannot increment non-numeric field {}: {}",
                        field, other
                    )))
                }
            };
            doc.insert(field.clone(), next);
        }

        for field in &self.unset {
            doc.remove(field);
        }

        Ok(())
    }
}

fn add_numbers(current: &Number, delta: &Value) -> StoreResult<Value> {
    let delta = match delta {
        Value::Number(n) => n,
        _ => return Err(StoreError::operation("Increment must be a number")),
    };

    if let (Some(a), Some(b)) = (current.as_i64(), delta.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Ok(Value::from(sum));
        }
    }

    let sum = current.as_f64().unwrap_or(0.0) + delta.as_f64().unwrap_or(0.0);
    Number::from_f64(sum)
        .map(Value::Number)
        .ok_or_else(|| StoreError::operation("Increment produced a non-finite number"))
}
