//! Snapshot serialization — loop state to/from JSON.
//!
//! A snapshot is taken every SNAPSHOT_INTERVAL months and captures
//! pools, demand history, and the hiring pipeline at month end.

use crate::{
    clock::SimClock,
    engine::SimulationState,
    types::{Month, RunId},
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_INTERVAL: Month = 3; // quarterly

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub run_id: RunId,
    pub month:  Month,
    pub clock:  SimClock,
    pub state:  SimulationState,
}
