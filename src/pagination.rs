//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of records to return when the request does not set a limit.
    pub default_limit: u64,
    /// The largest limit a request may ask for. Larger limits are clamped.
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

/// A validated slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The maximum number of records to return.
    pub limit: u64,
    /// The number of records to skip.
    pub skip: u64,
}

impl PaginationConfig {
    /// Resolve the optional `limit` and `skip` request parameters.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `limit` is zero.
    pub fn page(&self, limit: Option<u64>, skip: Option<u64>) -> Result<Page, Error> {
        let limit = match limit {
            Some(0) => return Err(Error::validation("limit must be greater than 0")),
            Some(limit) => limit.min(self.max_limit),
            None => self.default_limit,
        };

        Ok(Page {
            limit,
            skip: skip.unwrap_or(0),
        })
    }
}

/// Whether records remain after the page that was returned.
pub fn has_more(total: u64, skip: u64, returned: u64) -> bool {
    total > skip + returned
}
