//! Config validation, command-line overrides, and the bundled data files.

use workforce_core::{
    config::{BackfillPolicy, ConfigOverrides, SimConfig},
    dataset::{build_monthly_trends, split, Dataset, HeadcountRecord, TrendRecord},
    employee::EmployeeStatus,
    error::SimError,
};

const DATA_DIR: &str = "../data";

fn overrides(attrition: Option<&str>, maximum_strength: Option<&str>) -> ConfigOverrides {
    ConfigOverrides {
        attrition: attrition.map(str::to_string),
        maximum_strength: maximum_strength.map(str::to_string),
        ..ConfigOverrides::default()
    }
}

#[test]
fn bundled_config_loads_and_validates() {
    let config = SimConfig::load(DATA_DIR).expect("data/config/simulation.json");
    assert_eq!(config, SimConfig::default());
    assert_eq!(config.backfill_policy, BackfillPolicy::ReplacementFirst);
}

#[test]
fn bundled_dataset_builds_pools() {
    let dataset = Dataset::load(DATA_DIR).expect("data/dataset");
    let (trend, schema) = build_monthly_trends(&dataset.demand_trend).unwrap();
    let (billable, bench) = split(&dataset.headcount, &schema).unwrap();

    assert_eq!(trend.len(), 12);
    assert_eq!(billable.len() + bench.len(), dataset.headcount.len());
    assert!(billable.iter().all(|e| e.assigned_skill.is_some()));
    assert!(bench.iter().all(|e| e.assigned_skill.is_none()));
    assert!(billable.len() + bench.len() <= SimConfig::default().max_headcount);
}

#[test]
fn overrides_apply_and_revalidate() {
    let base = SimConfig::default_test();
    let patched = ConfigOverrides {
        billable_revenue:  Some("1000".into()),
        cost_per_resource: Some(" 700.5 ".into()),
        attrition:         Some("0.1".into()),
        maximum_strength:  Some("150".into()),
    }
    .apply_to(&base)
    .unwrap();

    assert_eq!(patched.revenue_per_billable, 1000.0);
    assert_eq!(patched.cost_per_resource, 700.5);
    assert_eq!(patched.attrition_rate, 0.1);
    assert_eq!(patched.max_headcount, 150);
    assert_eq!(patched.notice_period, base.notice_period);
}

#[test]
fn non_numeric_override_is_rejected() {
    let err = overrides(Some("high"), None)
        .apply_to(&SimConfig::default_test())
        .unwrap_err();
    assert!(matches!(err, SimError::Config { ref field, .. } if field == "attrition"));
}

#[test]
fn out_of_range_overrides_are_rejected() {
    let base = SimConfig::default_test();
    assert!(overrides(Some("1.5"), None).apply_to(&base).is_err());
    assert!(overrides(Some("-0.1"), None).apply_to(&base).is_err());
    assert!(overrides(None, Some("0")).apply_to(&base).is_err());
    assert!(overrides(None, Some("10.5")).apply_to(&base).is_err());
    assert!(overrides(None, Some("ten")).apply_to(&base).is_err());
}

#[test]
fn fixed_constants_cannot_be_changed() {
    let base = SimConfig::default_test();
    assert!(SimConfig { lead_time: 3, ..base.clone() }.validate().is_err());
    assert!(SimConfig { horizon: 24, ..base.clone() }.validate().is_err());
    assert!(SimConfig { notice_period: 0, ..base.clone() }.validate().is_err());
    assert!(SimConfig { prev_months: 0, ..base.clone() }.validate().is_err());
    assert!(SimConfig { cost_per_resource: 0.0, ..base }.validate().is_err());
}

#[test]
fn bench_capacity_from_annual_budget() {
    let config = SimConfig::default();
    // 5,760,000 over 12 months at 685 per head.
    assert_eq!(config.monthly_bench_budget(), 480_000.0);
    assert_eq!(config.bench_capacity(), 700);
    assert_eq!(SimConfig::default_test().bench_capacity(), 40);
}

fn record(id: &str, skills: &[&str], status: EmployeeStatus) -> HeadcountRecord {
    HeadcountRecord {
        employee_id: id.into(),
        skills:      skills.iter().map(|s| s.to_string()).collect(),
        status,
    }
}

#[test]
fn malformed_datasets_are_rejected() {
    let trend = vec![TrendRecord { skill: "java".into(), monthly: vec![5; 12] }];
    let (_, schema) = build_monthly_trends(&trend).unwrap();

    let unknown = [record("E1", &["cobol"], EmployeeStatus::Bench)];
    assert!(split(&unknown, &schema).is_err());

    let duplicate = [
        record("E1", &["java"], EmployeeStatus::Bench),
        record("E1", &["java"], EmployeeStatus::Billable),
    ];
    assert!(split(&duplicate, &schema).is_err());

    let skill_less = [record("E1", &[], EmployeeStatus::Bench)];
    assert!(split(&skill_less, &schema).is_err());

    let short = vec![TrendRecord { skill: "java".into(), monthly: vec![5; 11] }];
    assert!(build_monthly_trends(&short).is_err());
}
