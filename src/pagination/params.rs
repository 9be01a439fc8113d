//! Paging parameters

use serde::{Deserialize, Serialize};

/// Per-request paging parameters.
///
/// `start` defaults to 1 and a `start` of 0 never produces a skip stage, so
/// the default skips the first matching row. Pass `with_start(0)` to read
/// from the first row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageParams {
    /// Compute `PageInfo` (default: true)
    #[serde(default = "default_get_page_info")]
    pub get_page_info: bool,

    /// Order spec, e.g. `"CreatedAt desc,Name asc"` (default: empty, no sort)
    #[serde(default)]
    pub order_name: String,

    /// Rows to skip (default: 1)
    #[serde(default = "default_start")]
    pub start: u64,

    /// Row limit, 0 passed through as is (default: 0)
    #[serde(default)]
    pub length: u64,
}

fn default_get_page_info() -> bool {
    true
}

fn default_start() -> u64 {
    1
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            get_page_info: default_get_page_info(),
            order_name: String::new(),
            start: default_start(),
            length: 0,
        }
    }
}

impl PageParams {
    /// Default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order spec
    pub fn with_order(mut self, order_name: impl Into<String>) -> Self {
        self.order_name = order_name.into();
        self
    }

    /// Sets the skip count
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Sets the row limit
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    /// Turns page metadata on or off
    pub fn with_page_info(mut self, get_page_info: bool) -> Self {
        self.get_page_info = get_page_info;
        self
    }
}
