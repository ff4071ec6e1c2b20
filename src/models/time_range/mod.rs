// Time range module
// The host-owned [from, to] filter

use serde::{Deserialize, Serialize};

use crate::utils::date::{self, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Instant,
    pub to: Instant,
}

impl TimeRange {
    pub fn new(from: Instant, to: Instant) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, instant: Instant) -> bool {
        self.from <= instant && instant <= self.to
    }

    pub fn middle(&self) -> Instant {
        date::middle(self.from, self.to)
    }
}
