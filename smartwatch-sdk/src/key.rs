//! Composite counter keys.

use std::fmt;

/// Logical check instance used when none is configured.
pub const DEFAULT_CHECK: &str = "smart_stats";

/// Counter name of the command timeout rate.
pub const CMD_TIMEOUT_COUNTER: &str = "cmd_timeout";

/// Key addressing one counter: `<check>.<item>.<counter>`.
///
/// Items of different devices never produce the same key, so evaluations
/// of distinct devices never contend for a counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RateKey {
    pub check: String,
    pub item: String,
    pub counter: String,
}

impl RateKey {
    pub fn new(
        check: impl Into<String>,
        item: impl Into<String>,
        counter: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            item: item.into(),
            counter: counter.into(),
        }
    }

    /// Key of the command timeout counter of `item` under the default check.
    pub fn cmd_timeout(item: impl Into<String>) -> Self {
        Self::new(DEFAULT_CHECK, item, CMD_TIMEOUT_COUNTER)
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.check, self.item, self.counter)
    }
}
