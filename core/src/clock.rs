//! Simulation clock — owns the month counter and the fixed horizon.

use crate::{
    error::{SimError, SimResult},
    types::{Month, RunId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub run_id:        RunId,
    pub current_month: Month,
    pub horizon:       Month,
}

impl SimClock {
    pub fn new(run_id: RunId, horizon: Month) -> Self {
        Self { run_id, current_month: 0, horizon }
    }

    /// Advance one month. Returns the new month number.
    pub fn advance(&mut self) -> SimResult<Month> {
        if self.is_finished() {
            return Err(SimError::HorizonExceeded {
                month:   self.current_month + 1,
                horizon: self.horizon,
            });
        }
        self.current_month += 1;
        Ok(self.current_month)
    }

    pub fn is_finished(&self) -> bool {
        self.current_month >= self.horizon
    }

    pub fn months_remaining(&self) -> Month {
        self.horizon.saturating_sub(self.current_month)
    }
}
