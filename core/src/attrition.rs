//! Attrition simulator — who resigns, and when they actually leave.
//!
//! Resignation decisions are drawn once per decision month and written
//! to a ledger (employee → departure month). Both the forward-looking
//! forecast and the realized departures read that ledger, so an
//! employee forecast to leave at `m + notice_period` is exactly the
//! employee who leaves at `m + notice_period`.
//!
//! Draw order is billable pool then bench pool, in pool order, from a
//! single seeded stream. A run is reproducible from its seed.

use crate::{
    employee::{Employee, EmployeePool},
    rng::SubsystemRng,
    types::{EmployeeId, Month},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Employees leaving in a given month, split by the pool holding them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResignationSet {
    pub billable: Vec<Employee>,
    pub bench:    Vec<Employee>,
}

impl ResignationSet {
    pub fn len(&self) -> usize {
        self.billable.len() + self.bench.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn billable_ids(&self) -> Vec<EmployeeId> {
        self.billable.iter().map(|e| e.id.clone()).collect()
    }

    pub fn bench_ids(&self) -> Vec<EmployeeId> {
        self.bench.iter().map(|e| e.id.clone()).collect()
    }

    pub fn ids(&self) -> Vec<EmployeeId> {
        let mut ids = self.billable_ids();
        ids.extend(self.bench_ids());
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.billable.iter().chain(self.bench.iter()).any(|e| e.id == id)
    }
}

pub struct AttritionSimulator {
    attrition_rate: f64,
    notice_period:  Month,
    rng:            SubsystemRng,
    billable:       EmployeePool,
    bench:          EmployeePool,
    /// Scheduled departure month per resigning employee.
    ledger:         BTreeMap<EmployeeId, Month>,
    /// Decision months already drawn.
    drawn:          BTreeSet<Month>,
}

impl AttritionSimulator {
    /// Nobody is serving notice when the year opens: departures start
    /// at `1 + notice_period`, from the month-1 draw.
    pub fn new(
        billable: EmployeePool,
        bench: EmployeePool,
        attrition_rate: f64,
        notice_period: Month,
        rng: SubsystemRng,
    ) -> Self {
        Self {
            attrition_rate,
            notice_period,
            rng,
            billable,
            bench,
            ledger: BTreeMap::new(),
            drawn: BTreeSet::new(),
        }
    }

    pub fn notice_period(&self) -> Month {
        self.notice_period
    }

    /// Employees whose notice ends this month. Reads the ledger only;
    /// a month no draw reaches is empty.
    pub fn get_resigning_employees(&self, month: Month) -> ResignationSet {
        self.scheduled_between(month, month)
    }

    /// Employees already scheduled to leave in `first..=last`. Reads the
    /// ledger only.
    pub fn get_resigning_between(&self, first: Month, last: Month) -> ResignationSet {
        self.scheduled_between(first, last)
    }

    /// Employees expected to leave at `month + notice_period`. Draws the
    /// decisions for `month` the first time it is asked.
    pub fn get_future_resigning_employees(&mut self, month: Month) -> ResignationSet {
        self.draw(month);
        let departure = month + self.notice_period;
        self.scheduled_between(departure, departure)
    }

    /// Replace the held pools with the post-allocation workforce.
    /// Ledger entries for employees no longer present are dropped.
    pub fn update_employees(&mut self, billable: &EmployeePool, bench: &EmployeePool) {
        self.billable = billable.clone();
        self.bench = bench.clone();
        let (billable, bench) = (&self.billable, &self.bench);
        self.ledger.retain(|id, _| billable.contains(id) || bench.contains(id));
    }

    pub fn scheduled_departure(&self, id: &str) -> Option<Month> {
        self.ledger.get(id).copied()
    }

    pub fn pending_resignations(&self) -> usize {
        self.ledger.len()
    }

    fn draw(&mut self, decision: Month) {
        if !self.drawn.insert(decision) {
            return;
        }
        let departure = decision + self.notice_period;
        let mut selected = 0usize;
        for employee in self.billable.iter().chain(self.bench.iter()) {
            if self.ledger.contains_key(&employee.id) {
                continue;
            }
            if self.rng.chance(self.attrition_rate) {
                self.ledger.insert(employee.id.clone(), departure);
                selected += 1;
            }
        }
        log::debug!(
            "month={decision} attrition: {selected} resignations drawn, leaving at month {departure}"
        );
    }

    fn scheduled_between(&self, first: Month, last: Month) -> ResignationSet {
        let leaving = |e: &&Employee| {
            self.ledger
                .get(&e.id)
                .is_some_and(|departure| (first..=last).contains(departure))
        };
        ResignationSet {
            billable: self.billable.iter().filter(leaving).cloned().collect(),
            bench:    self.bench.iter().filter(leaving).cloned().collect(),
        }
    }
}
