use std::time::Duration as StdDuration;

use super::*;

/// Process-wide settings, fixed before the first cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleConfig {
    /// Nodes strictly older than this many seconds are drained.
    pub max_age: u64,
    /// Ceiling on nodes draining at the same time, and the per-cycle cap.
    pub max_nodes: usize,
    pub dry_run: bool,
    /// Time between cycle starts. `None` runs a single cycle.
    pub period: Option<StdDuration>,
}

impl CycleConfig {
    pub fn new(max_age: Duration, max_nodes: usize) -> Result<Self, ConfigurationError> {
        if max_nodes == 0 {
            return Err(ConfigurationError::MaxNodes);
        }

        Ok(Self {
            max_age: max_age.as_secs(),
            max_nodes,
            dry_run: false,
            period: None,
        })
    }

    pub fn dry_run(self, dry_run: bool) -> Self {
        Self { dry_run, ..self }
    }

    /// A zero period is the same as no period at all.
    pub fn period(self, period: impl Into<Option<Duration>>) -> Self {
        let period = period
            .into()
            .filter(|period| !period.is_zero())
            .map(|period| period.std_duration());
        Self { period, ..self }
    }

    pub fn is_one_shot(&self) -> bool {
        self.period.is_none()
    }
}
