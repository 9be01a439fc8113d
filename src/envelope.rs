//! Result envelope
//!
//! Uniform outcome wrapper for fallible store operations:
//!
//! ```text
//! {"hasError": false, "returnObject": [...], "PageInfo": {...}}
//! {"hasError": true, "errorMessage": "..."}
//! ```
//!
//! Extra named fields attached with [`Envelope::put_value`] serialize next to
//! the standard ones.

use std::future::Future;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Outcome of one operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    has_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_object: Option<T>,
    #[serde(skip)]
    error: Option<StoreError>,
    #[serde(flatten)]
    values: Map<String, Value>,
}

impl<T> Envelope<T> {
    /// Successful envelope
    pub fn ok(value: T) -> Self {
        Self {
            has_error: false,
            error_message: None,
            return_object: Some(value),
            error: None,
            values: Map::new(),
        }
    }

    /// Failed envelope; the message is passed through without the variant prefix
    pub fn fail(error: StoreError) -> Self {
        Self {
            has_error: true,
            error_message: Some(error.message().to_string()),
            return_object: None,
            error: Some(error),
            values: Map::new(),
        }
    }

    /// Envelope from a result
    pub fn from_result(result: StoreResult<T>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::fail(e),
        }
    }

    /// Awaits a fallible operation, capturing its error
    pub async fn wrap<F>(operation: F) -> Self
    where
        F: Future<Output = StoreResult<T>>,
    {
        Self::from_result(operation.await)
    }

    /// Attaches a named value, replacing any previous value of that name
    pub fn put_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Attached value by name
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// True when the operation failed
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Error message, when failed
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Underlying error, when failed
    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Returned value, when succeeded
    pub fn return_object(&self) -> Option<&T> {
        self.return_object.as_ref()
    }

    /// Converts back into a result, dropping attached values
    pub fn into_result(self) -> StoreResult<T> {
        match (self.return_object, self.error) {
            (Some(value), None) => Ok(value),
            (_, Some(error)) => Err(error),
            (None, None) => Err(StoreError::operation("envelope holds no value")),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// JSON rendering
    pub fn to_json(&self) -> StoreResult<Value> {
        serde_json::to_value(self).map_err(|e| StoreError::operation(e.to_string()))
    }
}
