//! Webinar schedule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The broadcast window of a webinar.
///
/// All event visibility is derived from elapsed time against `start_time`;
/// the schedule itself is the only persisted timebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Schedule {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        let schedule = Self {
            start_time,
            end_time,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check the `start_time < end_time` invariant
    pub fn validate(&self) -> Result<()> {
        if self.start_time >= self.end_time {
            return Err(Error::Schedule(format!(
                "start time {} is not before end time {}",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    /// Total scheduled length in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}
