//! The progress unit reported by running work

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A completion percentage in `[0, 100]`.
///
/// Values above 100 are clamped on construction. Within a single run the
/// delivered sequence of progress values is non-decreasing; enforcement
/// happens in [`RunContext::report`](crate::context::RunContext::report),
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// The starting value of every run.
    pub const ZERO: Progress = Progress(0);

    /// The value reported last by a fully successful run.
    pub const COMPLETE: Progress = Progress(100);

    /// Create a progress value, clamping anything above 100.
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// The percentage as an integer in `[0, 100]`.
    pub fn percent(self) -> u8 {
        self.0
    }

    /// Whether this value represents a finished run (100%).
    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl From<u8> for Progress {
    fn from(percent: u8) -> Self {
        Self::new(percent)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(Progress::new(37).percent(), 37);
        assert_eq!(Progress::new(100).percent(), 100);
        assert_eq!(Progress::new(250).percent(), 100);
        assert_eq!(Progress::from(101).percent(), 100);
    }

    #[test]
    fn test_completion() {
        assert!(!Progress::ZERO.is_complete());
        assert!(!Progress::new(99).is_complete());
        assert!(Progress::COMPLETE.is_complete());
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(Progress::new(12) < Progress::new(13));
        assert_eq!(Progress::new(42).to_string(), "42%");
    }
}
