//! Attrition ledger: decisions drawn once, departures after the notice period.

use std::collections::BTreeSet;

use workforce_core::{
    attrition::AttritionSimulator,
    config::SimConfig,
    dataset::Dataset,
    employee::{Employee, EmployeePool},
    engine::SimEngine,
    rng::SubsystemRng,
    types::EmployeeId,
};

fn pools(billable: usize, bench: usize) -> (EmployeePool, EmployeePool) {
    let b = (0..billable)
        .map(|i| Employee::billable(format!("B{i:03}"), vec!["java".into()], "java".into(), 0))
        .collect();
    let n = (0..bench)
        .map(|i| Employee::bench(format!("N{i:03}"), vec!["java".into()], 0))
        .collect();
    (b, n)
}

fn simulator(rate: f64, notice: u32, seed: u64) -> AttritionSimulator {
    let (billable, bench) = pools(150, 50);
    AttritionSimulator::new(billable, bench, rate, notice, SubsystemRng::new(seed, 0))
}

fn sorted(mut ids: Vec<EmployeeId>) -> Vec<EmployeeId> {
    ids.sort();
    ids
}

#[test]
fn everyone_resigns_at_rate_one() {
    let mut sim = simulator(1.0, 2, 5);
    assert_eq!(sim.get_future_resigning_employees(1).len(), 200);
    assert_eq!(sim.get_resigning_employees(3).len(), 200);
    // Everyone is already scheduled; later draws find nobody.
    assert!(sim.get_future_resigning_employees(2).is_empty());
}

/// Nobody is on notice when the year opens, so the first departures
/// come from the month-1 draw.
#[test]
fn no_departures_before_first_notice_ends() {
    let mut sim = simulator(1.0, 3, 8);
    for month in 1..=3 {
        assert!(sim.get_resigning_employees(month).is_empty(), "month {month}");
    }
    assert_eq!(sim.pending_resignations(), 0);
    sim.get_future_resigning_employees(1);
    assert!(sim.get_resigning_employees(3).is_empty());
    assert_eq!(sim.get_resigning_employees(4).len(), 200);
}

#[test]
fn departures_between_months_read_the_ledger() {
    let mut sim = simulator(0.3, 2, 13);
    let month_3 = sim.get_future_resigning_employees(1);
    let month_4 = sim.get_future_resigning_employees(2);

    let between = sim.get_resigning_between(3, 4);
    assert_eq!(between.len(), month_3.len() + month_4.len());
    assert_eq!(sim.get_resigning_between(2, 3), month_3);
    assert!(sim.get_resigning_between(5, 12).is_empty());
}

#[test]
fn nobody_resigns_at_rate_zero() {
    let mut sim = simulator(0.0, 2, 5);
    for month in 1..=12 {
        assert!(sim.get_resigning_employees(month).is_empty());
        assert!(sim.get_future_resigning_employees(month).is_empty());
    }
    assert_eq!(sim.pending_resignations(), 0);
}

#[test]
fn repeated_queries_do_not_redraw() {
    let mut sim = simulator(0.3, 2, 11);
    let first = sim.get_future_resigning_employees(1);
    let again = sim.get_future_resigning_employees(1);
    assert_eq!(first, again);
    assert_eq!(sim.get_resigning_employees(3), first);
}

/// Whoever is forecast at month m leaves at month m + notice, and an
/// employee is never drawn twice.
#[test]
fn forecasts_become_departures_after_notice() {
    let notice = 3;
    let mut sim = simulator(0.1, notice, 2024);
    let (mut billable, mut bench) = pools(150, 50);
    let mut forecasts: Vec<Vec<EmployeeId>> = Vec::new();
    let mut ever_drawn: BTreeSet<EmployeeId> = BTreeSet::new();

    for month in 1..=9u32 {
        let leaving = sim.get_resigning_employees(month);
        if month > notice {
            let expected = &forecasts[(month - notice - 1) as usize];
            assert_eq!(sorted(leaving.ids()), sorted(expected.clone()), "month {month}");
        } else {
            assert!(leaving.is_empty(), "month {month}");
        }

        let future = sim.get_future_resigning_employees(month);
        for id in future.ids() {
            assert!(ever_drawn.insert(id.clone()), "{id} drawn twice");
            assert_eq!(sim.scheduled_departure(&id), Some(month + notice));
        }
        forecasts.push(future.ids());

        billable.remove_many(&leaving.billable_ids());
        bench.remove_many(&leaving.bench_ids());
        sim.update_employees(&billable, &bench);
    }
}

#[test]
fn departed_employees_leave_the_ledger() {
    let mut sim = simulator(1.0, 1, 3);
    sim.get_future_resigning_employees(1);
    let leaving = sim.get_resigning_employees(2);
    assert_eq!(leaving.len(), 200);
    assert_eq!(sim.pending_resignations(), 200);

    let (mut billable, mut bench) = pools(150, 50);
    billable.remove_many(&leaving.billable_ids());
    bench.remove_many(&leaving.bench_ids());
    sim.update_employees(&billable, &bench);

    assert_eq!(sim.pending_resignations(), 0);
    assert!(sim.scheduled_departure("B000").is_none());
}

#[test]
fn same_seed_same_ledger() {
    let mut a = simulator(0.2, 2, 77);
    let mut b = simulator(0.2, 2, 77);
    for month in 1..=4 {
        assert_eq!(a.get_future_resigning_employees(month), b.get_future_resigning_employees(month));
    }
}

#[test]
fn engine_realizes_every_forecast_resignation() {
    let config = SimConfig { attrition_rate: 0.15, ..SimConfig::default_test() };
    let mut engine =
        SimEngine::in_memory("attrition-test".into(), 9, config, &Dataset::default_test()).unwrap();
    engine.run_year().unwrap();
    let records = engine.records();
    let notice = engine.config.notice_period as usize;

    for (i, record) in records.iter().enumerate().take(records.len() - notice) {
        let realized = &records[i + notice].resigning;
        assert_eq!(
            sorted(record.future_resigning.clone()),
            sorted(realized.ids()),
            "month {}",
            record.month
        );
    }

    // Leavers are gone for good.
    let state = engine.state();
    for record in records {
        for id in record.resigning.ids() {
            assert!(!state.billable.contains(&id) && !state.bench.contains(&id));
        }
    }
    let total: usize = records.iter().map(|r| r.details.resignations()).sum();
    assert!(total > 0, "15% monthly attrition produced no resignations");
}
