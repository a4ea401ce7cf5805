//! Local search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the local search engine.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use carp_routing::local_search::SearchConfig;
///
/// let config = SearchConfig::default().with_time_limit(Duration::from_secs(5));
/// assert_eq!(config.time_limit, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Wall-clock budget for the improvement loop. Checked once per
    /// iteration, before any neighborhood is tried.
    pub time_limit: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(120),
        }
    }
}

impl SearchConfig {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}
