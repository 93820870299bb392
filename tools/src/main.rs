//! workforce-runner: headless runner for the workforce supply–demand simulation.
//!
//! Usage:
//!   workforce-runner --seed 1 --data-dir ./data --db run.db
//!   workforce-runner -br 950 -c 700 -a 0.15 -ms 11000 --json

use anyhow::Result;
use workforce_core::{
    analysis::{DetailsSummary, MonthAnalysis, YearAnalysis},
    config::{ConfigOverrides, SimConfig},
    dataset::Dataset,
    engine::SimEngine,
    planner::MonthDetails,
    store::SimStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, &["--seed"], 1u64)?;
    let json = args.iter().any(|a| a == "--json");
    let db = find_arg(&args, &["--db"]).unwrap_or(":memory:");
    let data_dir = find_arg(&args, &["--data-dir"]).unwrap_or("./data");

    let overrides = ConfigOverrides {
        billable_revenue:  find_arg(&args, &["-br", "--billable_revenue"]).map(String::from),
        cost_per_resource: find_arg(&args, &["-c", "--cost_per_resource"]).map(String::from),
        attrition:         find_arg(&args, &["-a", "--attrition"]).map(String::from),
        maximum_strength:  find_arg(&args, &["-ms", "--maximum_strength"]).map(String::from),
    };

    // Configuration problems are fatal before any month runs.
    let config = overrides.apply_to(&SimConfig::load(data_dir)?)?;
    let dataset = Dataset::load(data_dir)?;

    let store = if db == ":memory:" { SimStore::in_memory()? } else { SimStore::open(db)? };
    store.migrate()?;

    let started_at = chrono::Utc::now();
    let run_id = format!("run-{seed}-{}", started_at.format("%Y%m%dT%H%M%S"));
    store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), &started_at.to_rfc3339())?;

    let mut engine = SimEngine::build(run_id.clone(), seed, config.clone(), &dataset, store)?;

    if !json {
        print_header(&config, &engine, seed, db, data_dir);
    }

    let report = engine.run_year()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for record in &report.months {
        print_month(&record.details, &record.analysis);
    }
    print_year(&report.mean_details, &report.analysis);
    Ok(())
}

fn print_header(config: &SimConfig, engine: &SimEngine, seed: u64, db: &str, data_dir: &str) {
    let rule = "-".repeat(60);
    println!("Workforce supply–demand simulation");
    println!("  run_id:    {}", engine.run_id);
    println!("  seed:      {seed}");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!("{rule}");
    println!("Given variables");
    println!("  Revenue per billable resource: {}", config.revenue_per_billable);
    println!("  Cost per resource:             {}", config.cost_per_resource);
    println!("  Total bench budget:            {}", config.total_bench_budget);
    println!("  Attrition percentage:          {}", config.attrition_rate * 100.0);
    println!("  Maximum resources:             {}", config.max_headcount);
    println!("  Notice period (months):        {}", config.notice_period);
    println!("  Backfill policy:               {:?}", config.backfill_policy);
    println!("{rule}");
    println!("  Billable resources at the start of the year: {}", engine.state().billable.len());
    println!("  Benched resources at the start of the year:  {}", engine.state().bench.len());
    println!("{rule}");
    println!();
}

fn print_month(d: &MonthDetails, a: &MonthAnalysis) {
    println!("{}", "-".repeat(75));
    println!("Month {}", d.month);
    println!("  Details");
    println!("    Headcount:                          {}", d.headcount);
    println!("    Billable resources:                 {}", d.billable);
    println!("    Benched resources:                  {}", d.bench);
    println!("    New hires:                          {} ({} cancelled)", d.new_hires, d.hires_cancelled);
    println!("    Released to bench:                  {}", d.released_to_bench);
    println!("    Demanded resources:                 {}", d.demanded);
    println!("    Demanded resources - fulfilled:     {}", d.fulfilled);
    println!("    Demanded resources - unfulfilled:   {}", d.unfulfilled);
    println!("    Resignations (billable):            {}", d.resignations_billable);
    println!("    Resignations (bench):               {}", d.resignations_bench);
    println!("    Resignations (billable) - replaced: {}/{}", d.resignations_replaced, d.replacement_needed);
    println!("    Planned hires:                      {} ({} beyond ceilings)", d.planned_hires, d.hiring_shortfall);
    println!("    Bench over budget:                  {}", d.bench_over_budget);
    println!("  Analysis");
    println!("    Revenue:                  {:.2}", a.total_revenue);
    println!("    Cost:                     {:.2}", a.total_cost);
    println!("    Profit:                   {:.2}", a.total_profit);
    println!("    Bench budget consumption: {:.2}", a.bench_budget_consumption);
    println!("    Business value possible / captured / lost: {:.2} / {:.2} / {:.2}",
        a.possible_value, a.captured_value, a.lost_value);
    println!("      new demand:             {:.2} / {:.2} / {:.2}",
        a.possible_value_demand, a.captured_value_demand, a.lost_value_demand);
    println!("      replacing resignations: {:.2} / {:.2} / {:.2}",
        a.possible_value_replacing, a.captured_value_replacing, a.lost_value_replacing);
}

fn print_year(mean: &DetailsSummary, a: &YearAnalysis) {
    println!("{}", "-".repeat(75));
    println!("=== END OF SIMULATION ===");
    println!("  Mean headcount:         {:.1}", mean.headcount);
    println!("  Mean billable:          {:.1}", mean.billable);
    println!("  Mean bench:             {:.1}", mean.bench);
    println!("  Mean unfulfilled:       {:.1}", mean.unfulfilled);
    println!("  Mean planned hires:     {:.1}", mean.planned_hires);
    println!("  Mean bench over budget: {:.1}", mean.bench_over_budget);
    println!();
    println!("  Total revenue:          {:.2}", a.total_revenue);
    println!("  Total cost:             {:.2}", a.total_cost);
    println!("  Total profit:           {:.2}", a.total_profit);
    println!("  Bench budget used:      {:.2} ({:.1}%)",
        a.bench_budget_consumption, a.bench_budget_utilisation * 100.0);
    println!("  Business value captured {:.2} of {:.2} ({:.1}%)",
        a.captured_value, a.possible_value, a.capture_rate * 100.0);
    println!("  Business value lost:    {:.2}", a.lost_value);
}

fn find_arg<'a>(args: &'a [String], flags: &[&str]) -> Option<&'a str> {
    args.windows(2)
        .find(|w| flags.contains(&w[0].as_str()))
        .map(|w| w[1].as_str())
}

/// Parse a flag's value, falling back to `default` only when the flag is absent.
fn parse_arg<T>(args: &[String], flags: &[&str], default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match find_arg(args, flags) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value {raw:?} for {}: {e}", flags[0])),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        std::iter::once("workforce-runner")
            .chain(raw.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn seed_defaults_when_absent() {
        assert_eq!(parse_arg(&args(&["--json"]), &["--seed"], 1u64).unwrap(), 1);
    }

    #[test]
    fn seed_is_parsed() {
        assert_eq!(parse_arg(&args(&["--seed", "42"]), &["--seed"], 1u64).unwrap(), 42);
    }

    #[test]
    fn malformed_seed_is_rejected() {
        let err = parse_arg(&args(&["--seed", "abc"]), &["--seed"], 1u64).unwrap_err();
        assert!(err.to_string().contains("--seed"));
        assert!(parse_arg(&args(&["--seed", "-3"]), &["--seed"], 1u64).is_err());
    }

    #[test]
    fn short_and_long_flags_match() {
        let raw = args(&["-a", "0.1", "--maximum_strength", "50"]);
        assert_eq!(find_arg(&raw, &["-a", "--attrition"]), Some("0.1"));
        assert_eq!(find_arg(&raw, &["-ms", "--maximum_strength"]), Some("50"));
    }
}
