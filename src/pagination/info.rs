//! Page metadata

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Count and probed identifier for a criteria set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageInfo {
    /// Matching documents
    pub record_count: u64,
    /// Identifier of the probed document, or `""`
    pub max_code: Value,
}

impl PageInfo {
    /// The zero value: no records, empty code
    pub fn empty() -> Self {
        Self {
            record_count: 0,
            max_code: Value::String(String::new()),
        }
    }

    /// True for the zero value
    pub fn is_empty(&self) -> bool {
        self.record_count == 0 && self.max_code == Value::String(String::new())
    }

    /// JSON rendering
    pub fn to_value(&self) -> Value {
        json!({
            "RecordCount": self.record_count,
            "MaxCode": self.max_code,
        })
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::empty()
    }
}
