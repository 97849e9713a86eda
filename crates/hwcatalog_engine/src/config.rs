//! Configuration for query execution.

/// Configuration for query execution.
///
/// Controls validation and result-size bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Truncate results to this many rows after sorting.
    pub limit: Option<usize>,

    /// Fail with `LimitExceeded` when a query matches more rows than this.
    pub max_results: Option<usize>,

    /// Statically check queries before running them.
    pub validate: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: None,
            max_results: None,
            validate: true,
        }
    }
}

impl QueryConfig {
    /// Creates a configuration that rejects queries matching more than
    /// `max_results` rows.
    #[must_use]
    pub fn bounded(max_results: usize) -> Self {
        Self {
            max_results: Some(max_results),
            ..Self::default()
        }
    }

    /// Creates a configuration that skips static validation.
    ///
    /// Malformed queries still fail, but only once evaluation reaches the
    /// offending part, so an empty catalog may not report them.
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            validate: false,
            ..Self::default()
        }
    }

    /// Builder method to set the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder method to set the maximum result count.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Builder method to enable/disable static validation.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}
