//! Hiring pipeline — requisitions waiting out the lead time.

use crate::{
    error::{SimError, SimResult},
    types::{EmployeeId, Month, Skill},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One hire for one skill, issued at `issued_month`, available as bench
/// supply at `arrival_month`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HireRequisition {
    pub requisition_id: String,
    pub skill:          Skill,
    pub issued_month:   Month,
    pub arrival_month:  Month,
}

impl HireRequisition {
    /// Employee id the hire will carry once it arrives.
    pub fn hire_id(&self) -> EmployeeId {
        format!("HIRE-{}", self.requisition_id)
    }
}

/// Arrival month → requisitions. Each batch is scheduled once and
/// taken once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HiringPipeline {
    batches: BTreeMap<Month, Vec<HireRequisition>>,
}

impl HiringPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, arrival_month: Month, batch: Vec<HireRequisition>) -> SimResult<()> {
        if self.is_scheduled(arrival_month) {
            return Err(SimError::PipelineConflict { month: arrival_month });
        }
        self.batches.insert(arrival_month, batch);
        Ok(())
    }

    /// Remove and return the batch arriving in `month`.
    pub fn take_due(&mut self, month: Month) -> Vec<HireRequisition> {
        self.batches.remove(&month).unwrap_or_default()
    }

    /// The batch arriving in `month`, left in place.
    pub fn pending(&self, month: Month) -> &[HireRequisition] {
        self.batches.get(&month).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_pending(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }

    pub fn is_scheduled(&self, month: Month) -> bool {
        self.batches.contains_key(&month)
    }
}
