//! The simulation engine — drives the 12-month horizon.
//!
//! EXECUTION ORDER per month (fixed, documented, never reordered):
//!   1. Realized and notice-period resignations (attrition simulator)
//!   2. Due and pending hires (hiring pipeline)
//!   3. Current demand, recorded into history, then the month+2 forecast
//!   4. Supply planning
//!   5. Install pools, schedule requisitions, analyse, persist
//!   6. Hand the new pools back to the attrition simulator
//!
//! RULES:
//!   - The engine alone owns SimulationState; components get borrows.
//!   - All randomness flows through the RngBank.
//!   - Every state change is recorded in the event log.

use crate::{
    analysis::{analyse, analyse_year, summarise_details, DetailsSummary, MonthAnalysis, YearAnalysis},
    attrition::{AttritionSimulator, ResignationSet},
    clock::SimClock,
    config::SimConfig,
    dataset::{build_monthly_trends, split, Dataset},
    demand::{DemandHistory, DemandModel, SkillDemandVector},
    employee::EmployeePool,
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    pipeline::{HireRequisition, HiringPipeline},
    planner::{MonthDetails, PlanningInputs, SupplyPlan, SupplyPlanner},
    rng::{RngBank, RngSlot},
    snapshot::{SimSnapshot, SNAPSHOT_INTERVAL},
    store::{RosterKind, SimStore},
    types::{EmployeeId, Month, RunId},
};
use serde::{Deserialize, Serialize};

/// The only state threaded from month to month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationState {
    pub month:    Month,
    pub billable: EmployeePool,
    pub bench:    EmployeePool,
    pub history:  DemandHistory,
    pub pipeline: HiringPipeline,
}

impl SimulationState {
    pub fn headcount(&self) -> usize {
        self.billable.len() + self.bench.len()
    }
}

/// Everything one month produced, as handed to reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthRecord {
    pub month:            Month,
    pub demand:           SkillDemandVector,
    pub forecast:         SkillDemandVector,
    pub resigning:        ResignationSet,
    /// Expected to leave at month + notice period.
    pub future_resigning: Vec<EmployeeId>,
    /// Issued this month, arriving at month + lead time.
    pub requisitions:     Vec<HireRequisition>,
    pub details:          MonthDetails,
    pub analysis:         MonthAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearReport {
    pub run_id:       RunId,
    pub seed:         u64,
    pub months:       Vec<MonthRecord>,
    pub mean_details: DetailsSummary,
    pub analysis:     YearAnalysis,
}

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub config:   SimConfig,
    pub store:    SimStore,
    seed:         u64,
    state:        SimulationState,
    demand_model: DemandModel,
    attrition:    AttritionSimulator,
    planner:      SupplyPlanner,
    records:      Vec<MonthRecord>,
}

impl SimEngine {
    /// Validate inputs and wire every component. The store must already
    /// be migrated and hold the run row.
    pub fn build(
        run_id: RunId,
        seed: u64,
        config: SimConfig,
        dataset: &Dataset,
        store: SimStore,
    ) -> SimResult<Self> {
        config.validate()?;
        let (trend, schema) = build_monthly_trends(&dataset.demand_trend)?;
        let (billable, bench) = split(&dataset.headcount, &schema)?;

        let opening = billable.len() + bench.len();
        if opening > config.max_headcount {
            return Err(SimError::config(
                "max_headcount",
                format!("opening headcount {opening} exceeds ceiling {}", config.max_headcount),
            ));
        }

        let rng_bank = RngBank::new(seed);
        let attrition = AttritionSimulator::new(
            billable.clone(),
            bench.clone(),
            config.attrition_rate,
            config.notice_period,
            rng_bank.for_slot(RngSlot::Attrition),
        );
        let demand_model = DemandModel::new(schema, trend, config.prev_months)?;
        let planner = SupplyPlanner::new(&config);

        let engine = Self {
            clock: SimClock::new(run_id.clone(), config.horizon),
            state: SimulationState {
                month: 0,
                billable,
                bench,
                history: DemandHistory::new(config.horizon),
                pipeline: HiringPipeline::new(),
            },
            run_id,
            config,
            store,
            seed,
            demand_model,
            attrition,
            planner,
            records: Vec::new(),
        };

        engine.record_event(0, "engine", &SimEvent::RunInitialized {
            run_id:   engine.run_id.clone(),
            seed,
            billable: engine.state.billable.len(),
            bench:    engine.state.bench.len(),
        })?;
        log::info!(
            "month=0 engine: run {} seeded {seed}, billable={} bench={}",
            engine.run_id,
            engine.state.billable.len(),
            engine.state.bench.len(),
        );

        Ok(engine)
    }

    /// Engine over a fresh in-memory store.
    pub fn in_memory(
        run_id: RunId,
        seed: u64,
        config: SimConfig,
        dataset: &Dataset,
    ) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), "test")?;
        Self::build(run_id, seed, config, dataset, store)
    }

    /// Test defaults: `SimConfig::default_test()` over `Dataset::default_test()`.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::in_memory(run_id, seed, SimConfig::default_test(), &Dataset::default_test())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn records(&self) -> &[MonthRecord] {
        &self.records
    }

    pub fn attrition(&self) -> &AttritionSimulator {
        &self.attrition
    }

    pub fn demand_model(&self) -> &DemandModel {
        &self.demand_model
    }

    /// Process the next month.
    pub fn step_month(&mut self) -> SimResult<&MonthRecord> {
        let month = self.clock.advance()?;
        if month != self.state.month + 1 {
            return Err(SimError::MonthMismatch { expected: self.state.month + 1, actual: month });
        }
        self.state.month = month;
        self.record_event(month, "engine", &SimEvent::MonthStarted { month })?;

        // 1. Resignations.
        let resigning = self.attrition.get_resigning_employees(month);
        let future_resigning = self.attrition.get_future_resigning_employees(month);
        let upcoming_resigning = self
            .attrition
            .get_resigning_between(month + 1, month + self.config.lead_time);
        self.record_event(month, "attrition", &SimEvent::ResignationsRealized {
            month,
            billable: resigning.billable_ids(),
            bench:    resigning.bench_ids(),
        })?;
        self.record_event(month, "attrition", &SimEvent::ResignationsForecast {
            month,
            effective_month: month + self.attrition.notice_period(),
            employees:       future_resigning.ids(),
        })?;

        // 2. Hires.
        let arriving = self.state.pipeline.take_due(month);

        // 3. Demand.
        let demand = self.demand_model.predict_demand(&self.state.history, month);
        self.state.history.record(month, demand.clone())?;
        let forecast = self
            .demand_model
            .predict_demand_in_2_months(&self.state.history, month);
        self.record_event(month, "demand", &SimEvent::DemandObserved {
            month,
            demand: owned_counts(&demand),
        })?;
        self.record_event(month, "demand", &SimEvent::DemandForecast {
            month,
            target_month: month + self.config.lead_time,
            demand:       owned_counts(&forecast),
        })?;

        // 4. Planning.
        let SupplyPlan { details, billable, bench, requisitions } =
            self.planner.plan(PlanningInputs {
                month,
                forecasted_demand:  &forecast,
                demand:             &demand,
                billable:           &self.state.billable,
                bench:              &self.state.bench,
                current_resigning:  &resigning,
                future_resigning:   &future_resigning,
                upcoming_resigning: &upcoming_resigning,
                arriving:           &arriving,
                pending:            self.state.pipeline.pending(month + 1),
                schema:             self.demand_model.schema(),
            });

        // 5. Install, schedule, analyse, persist.
        self.state.billable = billable;
        self.state.bench = bench;
        let arrival_month = month + self.config.lead_time;
        self.state.pipeline.schedule(arrival_month, requisitions.clone())?;
        let analysis = analyse(&details, &self.config);

        self.record_event(month, "planner", &SimEvent::HiresArrived {
            month,
            employees: arriving[..details.new_hires].iter().map(HireRequisition::hire_id).collect(),
        })?;
        self.record_event(month, "planner", &SimEvent::SupplyPlanned {
            month,
            details: details.clone(),
        })?;
        self.record_event(month, "planner", &SimEvent::HiresRequisitioned {
            month,
            arrival_month,
            skills: requisitions.iter().map(|r| r.skill.clone()).collect(),
        })?;
        self.persist_month(month, &resigning, &details, &analysis, &requisitions)?;

        if month % SNAPSHOT_INTERVAL == 0 {
            self.take_snapshot(month)?;
        }

        // 6. Attrition sees the post-allocation workforce.
        self.attrition
            .update_employees(&self.state.billable, &self.state.bench);
        self.record_event(month, "engine", &SimEvent::MonthCompleted { month })?;

        log::info!(
            "month={month} engine: revenue={:.0} cost={:.0} lost_value={:.0} hires_in_pipeline={}",
            analysis.total_revenue,
            analysis.total_cost,
            analysis.lost_value,
            self.state.pipeline.total_pending(),
        );

        self.records.push(MonthRecord {
            month,
            demand,
            forecast,
            resigning,
            future_resigning: future_resigning.ids(),
            requisitions,
            details,
            analysis,
        });
        Ok(&self.records[self.records.len() - 1])
    }

    /// Run every remaining month of the horizon and summarise the year.
    pub fn run_year(&mut self) -> SimResult<YearReport> {
        while !self.clock.is_finished() {
            self.step_month()?;
        }
        let report = self.report();
        self.store
            .save_year_summary(&self.run_id, &report.mean_details, &report.analysis)?;
        log::info!(
            "month={} engine: year complete, profit={:.0} capture_rate={:.3}",
            self.clock.current_month,
            report.analysis.total_profit,
            report.analysis.capture_rate,
        );
        Ok(report)
    }

    /// Report over the months processed so far.
    pub fn report(&self) -> YearReport {
        let details: Vec<MonthDetails> = self.records.iter().map(|r| r.details.clone()).collect();
        let analyses: Vec<MonthAnalysis> = self.records.iter().map(|r| r.analysis.clone()).collect();
        YearReport {
            run_id:       self.run_id.clone(),
            seed:         self.seed,
            months:       self.records.clone(),
            mean_details: summarise_details(&details),
            analysis:     analyse_year(&analyses, &self.config),
        }
    }

    fn persist_month(
        &self,
        month: Month,
        resigning: &ResignationSet,
        details: &MonthDetails,
        analysis: &MonthAnalysis,
        requisitions: &[HireRequisition],
    ) -> SimResult<()> {
        let run_id = self.run_id.as_str();
        self.store.insert_month_details(run_id, details)?;
        self.store.insert_month_analysis(run_id, analysis)?;
        self.store
            .insert_roster(run_id, month, RosterKind::ResigningBillable, &resigning.billable)?;
        self.store
            .insert_roster(run_id, month, RosterKind::ResigningBench, &resigning.bench)?;
        self.store
            .insert_roster(run_id, month, RosterKind::Billable, self.state.billable.as_slice())?;
        self.store
            .insert_roster(run_id, month, RosterKind::Bench, self.state.bench.as_slice())?;
        self.store.insert_requisitions(run_id, requisitions)?;
        Ok(())
    }

    fn record_event(&self, month: Month, component: &str, event: &SimEvent) -> SimResult<()> {
        let entry = EventLogEntry {
            id:         None,
            run_id:     self.run_id.clone(),
            month,
            component:  component.to_string(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        self.store.append_event(&entry)
    }

    fn take_snapshot(&self, month: Month) -> SimResult<()> {
        let snapshot = SimSnapshot {
            run_id: self.run_id.clone(),
            month,
            clock:  self.clock.clone(),
            state:  self.state.clone(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.store.save_snapshot(&self.run_id, month, &json)?;
        log::debug!("month={month} engine: snapshot saved");
        Ok(())
    }
}

fn owned_counts(demand: &SkillDemandVector) -> Vec<(String, u32)> {
    demand.iter().map(|(skill, count)| (skill.to_string(), count)).collect()
}
