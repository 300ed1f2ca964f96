//! Wall-clock budget checked between files.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self::start(None)
    }

    pub fn expired(&self) -> bool {
        self.budget
            .is_some_and(|budget| self.started.elapsed() >= budget)
    }
}
