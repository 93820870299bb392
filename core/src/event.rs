//! The run event log — every state change the loop makes, in order.
//!
//! Variants are added over time — never removed or reordered.

use crate::{
    planner::MonthDetails,
    types::{EmployeeId, Month, RunId, Skill},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    RunInitialized {
        run_id:   RunId,
        seed:     u64,
        billable: usize,
        bench:    usize,
    },
    MonthStarted {
        month: Month,
    },
    MonthCompleted {
        month: Month,
    },

    // ── Attrition events ───────────────────────────
    ResignationsRealized {
        month:    Month,
        billable: Vec<EmployeeId>,
        bench:    Vec<EmployeeId>,
    },
    ResignationsForecast {
        month:           Month,
        effective_month: Month,
        employees:       Vec<EmployeeId>,
    },

    // ── Demand events ──────────────────────────────
    DemandObserved {
        month:  Month,
        demand: Vec<(Skill, u32)>,
    },
    DemandForecast {
        month:        Month,
        target_month: Month,
        demand:       Vec<(Skill, u32)>,
    },

    // ── Planning events ────────────────────────────
    HiresArrived {
        month:     Month,
        employees: Vec<EmployeeId>,
    },
    SupplyPlanned {
        month:   Month,
        details: MonthDetails,
    },
    HiresRequisitioned {
        month:         Month,
        arrival_month: Month,
        skills:        Vec<Skill>,
    },
}

impl SimEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }       => "run_initialized",
            Self::MonthStarted { .. }         => "month_started",
            Self::MonthCompleted { .. }       => "month_completed",
            Self::ResignationsRealized { .. } => "resignations_realized",
            Self::ResignationsForecast { .. } => "resignations_forecast",
            Self::DemandObserved { .. }       => "demand_observed",
            Self::DemandForecast { .. }       => "demand_forecast",
            Self::HiresArrived { .. }         => "hires_arrived",
            Self::SupplyPlanned { .. }        => "supply_planned",
            Self::HiresRequisitioned { .. }   => "hires_requisitioned",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub month:      Month,
    pub component:  String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
