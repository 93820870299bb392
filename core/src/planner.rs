//! Supply planner — the monthly allocation core.
//!
//! ORDER (fixed):
//!   1. Realized resignations leave their pools.
//!   2. Arriving hires join the bench, up to the headcount ceiling.
//!   3. Billable headcount above current demand rolls off to the bench.
//!   4. Bench employees are matched to resignation backfill and new
//!      demand, in the order the backfill policy sets.
//!   5. Requisitions for month + lead time are sized from the forecast
//!      and the notice-period resignations, then capped by the
//!      headcount ceiling and the bench budget.
//!
//! Shortfalls and budget overruns are recorded in the month's details,
//! never raised.

use crate::{
    attrition::ResignationSet,
    config::{BackfillPolicy, SimConfig},
    demand::{SkillDemandVector, SkillSchema},
    employee::{Employee, EmployeePool},
    pipeline::HireRequisition,
    types::{EmployeeId, Month, Skill},
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

/// Borrowed view of everything the planner needs for one month.
pub struct PlanningInputs<'a> {
    pub month:              Month,
    /// Demand expected at `month + lead time`.
    pub forecasted_demand:  &'a SkillDemandVector,
    pub demand:             &'a SkillDemandVector,
    pub billable:           &'a EmployeePool,
    pub bench:              &'a EmployeePool,
    pub current_resigning:  &'a ResignationSet,
    /// Leaving at `month + notice_period`.
    pub future_resigning:   &'a ResignationSet,
    /// Already scheduled to leave after this month, up to the arrival of
    /// this month's requisitions.
    pub upcoming_resigning: &'a ResignationSet,
    /// Requisitions arriving this month.
    pub arriving:           &'a [HireRequisition],
    /// Requisitions arriving next month, already in the pipeline.
    pub pending:            &'a [HireRequisition],
    pub schema:             &'a SkillSchema,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillOutcome {
    pub skill:              Skill,
    pub demand:             u32,
    pub forecast:           u32,
    /// Billable on this skill after allocation.
    pub billable:           usize,
    pub released:           usize,
    pub demanded:           usize,
    pub fulfilled:          usize,
    pub unfulfilled:        usize,
    pub replacement_needed: usize,
    pub replaced:           usize,
    pub planned_hires:      usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthDetails {
    pub month:                 Month,
    pub opening_headcount:     usize,
    pub headcount:             usize,
    pub billable:              usize,
    pub bench:                 usize,
    pub new_hires:             usize,
    pub hires_cancelled:       usize,
    pub released_to_bench:     usize,
    pub demanded:              usize,
    pub fulfilled:             usize,
    pub unfulfilled:           usize,
    pub resignations_billable: usize,
    pub resignations_bench:    usize,
    pub replacement_needed:    usize,
    pub resignations_replaced: usize,
    pub planned_hires:         usize,
    pub hiring_shortfall:      usize,
    /// Idle headcount above what the bench budget carries.
    pub bench_over_budget:     usize,
    pub skills:                Vec<SkillOutcome>,
}

impl MonthDetails {
    pub fn resignations(&self) -> usize {
        self.resignations_billable + self.resignations_bench
    }

    pub fn unreplaced_resignations(&self) -> usize {
        self.replacement_needed - self.resignations_replaced
    }
}

#[derive(Debug, Clone)]
pub struct SupplyPlan {
    pub details:      MonthDetails,
    pub billable:     EmployeePool,
    pub bench:        EmployeePool,
    /// Requisitions arriving at `month + lead time`.
    pub requisitions: Vec<HireRequisition>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Need {
    Backfill,
    Growth,
}

impl BackfillPolicy {
    fn phases(&self) -> [Need; 2] {
        match self {
            Self::ReplacementFirst => [Need::Backfill, Need::Growth],
            Self::DemandFirst      => [Need::Growth, Need::Backfill],
        }
    }
}

// ── Planner ──────────────────────────────────────────────────────────────────

pub struct SupplyPlanner {
    max_headcount:  usize,
    bench_capacity: usize,
    policy:         BackfillPolicy,
    lead_time:      Month,
}

impl SupplyPlanner {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            max_headcount:  config.max_headcount,
            bench_capacity: config.bench_capacity(),
            policy:         config.backfill_policy,
            lead_time:      config.lead_time,
        }
    }

    pub fn plan(&self, inputs: PlanningInputs<'_>) -> SupplyPlan {
        let month = inputs.month;
        let skills = inputs.schema.skills();
        let mut billable = inputs.billable.clone();
        let mut bench = inputs.bench.clone();
        let opening_headcount = billable.len() + bench.len();

        let mut outcomes: Vec<SkillOutcome> = skills
            .iter()
            .map(|skill| SkillOutcome {
                skill:    skill.clone(),
                demand:   inputs.demand.get(skill),
                forecast: inputs.forecasted_demand.get(skill),
                ..SkillOutcome::default()
            })
            .collect();

        // 1. Resignations take effect.
        let left_billable = billable.remove_many(&inputs.current_resigning.billable_ids());
        let left_bench = bench.remove_many(&inputs.current_resigning.bench_ids());

        // 2. Arrivals join the bench.
        let room = self.max_headcount.saturating_sub(billable.len() + bench.len());
        let admitted = inputs.arriving.len().min(room);
        let hires_cancelled = inputs.arriving.len() - admitted;
        for req in &inputs.arriving[..admitted] {
            bench.push(Employee::bench(req.hire_id(), vec![req.skill.clone()], month));
        }
        if hires_cancelled > 0 {
            log::warn!(
                "month={month} planner: {hires_cancelled} arriving hires cancelled at headcount ceiling {}",
                self.max_headcount
            );
        }

        // 3. Roll-off where demand dropped below billable headcount.
        for outcome in outcomes.iter_mut() {
            let demand = outcome.demand as usize;
            while billable.count_assigned(&outcome.skill) > demand {
                let Some(mut employee) = billable.take_latest_assigned(&outcome.skill) else {
                    break;
                };
                employee.release();
                bench.push(employee);
                outcome.released += 1;
            }
        }

        // 4. Needs per skill.
        for outcome in outcomes.iter_mut() {
            let gap = (outcome.demand as usize)
                .saturating_sub(billable.count_assigned(&outcome.skill));
            let vacancies = left_billable
                .iter()
                .filter(|e| e.is_assigned_to(&outcome.skill))
                .count();
            outcome.replacement_needed = vacancies.min(gap);
            outcome.demanded = gap - outcome.replacement_needed;
        }

        // 5. Match bench supply, phase by phase.
        for need in self.policy.phases() {
            for outcome in outcomes.iter_mut() {
                let wanted = match need {
                    Need::Backfill => outcome.replacement_needed,
                    Need::Growth   => outcome.demanded,
                };
                let mut matched = 0;
                while matched < wanted {
                    let Some(mut employee) = bench.take_best_match(&outcome.skill) else {
                        break;
                    };
                    employee.assign(&outcome.skill, month);
                    billable.push(employee);
                    matched += 1;
                }
                match need {
                    Need::Backfill => outcome.replaced = matched,
                    Need::Growth   => {
                        outcome.fulfilled = matched;
                        outcome.unfulfilled = outcome.demanded - matched;
                    }
                }
            }
        }

        // 6. Requisitions for month + lead time.
        let (requisitions, hiring_shortfall) =
            self.requisition(&inputs, &billable, &bench, &mut outcomes);

        for outcome in outcomes.iter_mut() {
            outcome.billable = billable.count_assigned(&outcome.skill);
        }

        let bench_over_budget = bench.len().saturating_sub(self.bench_capacity);
        if bench_over_budget > 0 {
            log::warn!(
                "month={month} planner: bench of {} exceeds budget capacity {} by {bench_over_budget}",
                bench.len(),
                self.bench_capacity
            );
        }

        let sum = |f: fn(&SkillOutcome) -> usize| outcomes.iter().map(f).sum::<usize>();
        let details = MonthDetails {
            month,
            opening_headcount,
            headcount:             billable.len() + bench.len(),
            billable:              billable.len(),
            bench:                 bench.len(),
            new_hires:             admitted,
            hires_cancelled,
            released_to_bench:     sum(|o| o.released),
            demanded:              sum(|o| o.demanded),
            fulfilled:             sum(|o| o.fulfilled),
            unfulfilled:           sum(|o| o.unfulfilled),
            resignations_billable: left_billable.len(),
            resignations_bench:    left_bench.len(),
            replacement_needed:    sum(|o| o.replacement_needed),
            resignations_replaced: sum(|o| o.replaced),
            planned_hires:         requisitions.len(),
            hiring_shortfall,
            bench_over_budget,
            skills:                outcomes,
        };

        log::info!(
            "month={month} planner: headcount={} billable={} bench={} fulfilled={}/{} replaced={}/{} hires_planned={} shortfall={}",
            details.headcount,
            details.billable,
            details.bench,
            details.fulfilled,
            details.demanded,
            details.resignations_replaced,
            details.replacement_needed,
            details.planned_hires,
            details.hiring_shortfall,
        );

        SupplyPlan { details, billable, bench, requisitions }
    }

    /// Size, cap, and issue the requisitions for `month + lead time`.
    /// Returns the requisitions and the capped-out need.
    fn requisition(
        &self,
        inputs: &PlanningInputs<'_>,
        billable: &EmployeePool,
        bench: &EmployeePool,
        outcomes: &mut [SkillOutcome],
    ) -> (Vec<HireRequisition>, usize) {
        let month = inputs.month;
        // Everyone gone by the time the hires arrive. Next month's leavers
        // are already backfilled by the pending batch.
        let mut leaving: Vec<EmployeeId> = inputs.future_resigning.ids();
        leaving.extend(inputs.upcoming_resigning.ids());

        // Need at arrival, split into backfill for leavers and growth on
        // top of the current billable base.
        let mut needs: Vec<(usize, usize)> = outcomes
            .iter()
            .map(|o| {
                let assigned = billable.iter().filter(|e| e.is_assigned_to(&o.skill));
                let leavers = assigned.clone().filter(|e| leaving.contains(&e.id)).count();
                let projected = assigned.count() - leavers;
                let need = (o.forecast as usize).saturating_sub(projected);
                let backfill = need.min(leavers);
                (backfill, need - backfill)
            })
            .collect();

        // Cover from idle bench that is staying, then from next month's arrivals.
        let mut idle: EmployeePool = bench
            .iter()
            .filter(|e| !leaving.contains(&e.id))
            .cloned()
            .collect();
        let mut pending: Vec<&HireRequisition> = inputs.pending.iter().collect();

        let phases = self.policy.phases();
        for need in phases {
            for (outcome, (backfill, growth)) in outcomes.iter().zip(needs.iter_mut()) {
                let remaining = match need {
                    Need::Backfill => backfill,
                    Need::Growth   => growth,
                };
                while *remaining > 0 && idle.take_best_match(&outcome.skill).is_some() {
                    *remaining -= 1;
                }
                while *remaining > 0 {
                    let Some(idx) = pending.iter().position(|r| r.skill == outcome.skill) else {
                        break;
                    };
                    pending.remove(idx);
                    *remaining -= 1;
                }
            }
        }

        // Ceilings: total headcount including everything already in flight,
        // and idle headcount the bench budget can carry.
        let headcount_room = self
            .max_headcount
            .saturating_sub(billable.len() + bench.len() + inputs.pending.len());
        let budget_room = self.bench_capacity.saturating_sub(idle.len() + pending.len());
        let mut cap = headcount_room.min(budget_room);

        let arrival_month = month + self.lead_time;
        let mut requisitions = Vec::new();
        let mut shortfall = 0;
        for need in phases {
            for (outcome, (backfill, growth)) in outcomes.iter_mut().zip(needs.iter()) {
                let wanted = match need {
                    Need::Backfill => *backfill,
                    Need::Growth   => *growth,
                };
                let granted = wanted.min(cap);
                cap -= granted;
                shortfall += wanted - granted;
                outcome.planned_hires += granted;
                for _ in 0..granted {
                    requisitions.push(HireRequisition {
                        requisition_id: format!("{month:02}-{:04}", requisitions.len() + 1),
                        skill:          outcome.skill.clone(),
                        issued_month:   month,
                        arrival_month,
                    });
                }
            }
        }

        if shortfall > 0 {
            log::warn!(
                "month={month} planner: {shortfall} hires not requisitioned (headcount room {headcount_room}, budget room {budget_room})"
            );
        }

        (requisitions, shortfall)
    }
}
