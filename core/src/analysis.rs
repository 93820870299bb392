//! Monthly and yearly business analysis of planner output.
//!
//! This module is REACTIVE: it never touches pools or the pipeline,
//! it only prices what the planner recorded.

use crate::{config::SimConfig, planner::MonthDetails, types::Month};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthAnalysis {
    pub month:                    Month,
    pub total_revenue:            f64,
    pub total_cost:               f64,
    pub total_profit:             f64,
    pub bench_budget_consumption: f64,
    // All causes
    pub possible_value:           f64,
    pub captured_value:           f64,
    pub lost_value:               f64,
    // New demand
    pub possible_value_demand:    f64,
    pub captured_value_demand:    f64,
    pub lost_value_demand:        f64,
    // Resignation replacement
    pub possible_value_replacing: f64,
    pub captured_value_replacing: f64,
    pub lost_value_replacing:     f64,
}

pub fn analyse(details: &MonthDetails, config: &SimConfig) -> MonthAnalysis {
    let revenue = config.revenue_per_billable;
    let cost = config.cost_per_resource;
    let value = |n: usize| n as f64 * revenue;

    let total_revenue = value(details.billable);
    let total_cost = details.headcount as f64 * cost;

    let possible_value_demand = value(details.demanded);
    let captured_value_demand = value(details.fulfilled);
    let lost_value_demand = value(details.unfulfilled);

    let possible_value_replacing = value(details.replacement_needed);
    let captured_value_replacing = value(details.resignations_replaced);
    let lost_value_replacing = value(details.unreplaced_resignations());

    MonthAnalysis {
        month: details.month,
        total_revenue,
        total_cost,
        total_profit: total_revenue - total_cost,
        bench_budget_consumption: details.bench as f64 * cost,
        possible_value: possible_value_demand + possible_value_replacing,
        captured_value: captured_value_demand + captured_value_replacing,
        lost_value: lost_value_demand + lost_value_replacing,
        possible_value_demand,
        captured_value_demand,
        lost_value_demand,
        possible_value_replacing,
        captured_value_replacing,
        lost_value_replacing,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct YearAnalysis {
    pub months:                   usize,
    pub total_revenue:            f64,
    pub total_cost:               f64,
    pub total_profit:             f64,
    pub bench_budget_consumption: f64,
    /// Bench spend as a share of the total bench budget.
    pub bench_budget_utilisation: f64,
    pub possible_value:           f64,
    pub captured_value:           f64,
    pub lost_value:               f64,
    pub possible_value_demand:    f64,
    pub captured_value_demand:    f64,
    pub lost_value_demand:        f64,
    pub possible_value_replacing: f64,
    pub captured_value_replacing: f64,
    pub lost_value_replacing:     f64,
    /// Captured over possible business value; 1.0 when nothing was at stake.
    pub capture_rate:             f64,
}

pub fn analyse_year(months: &[MonthAnalysis], config: &SimConfig) -> YearAnalysis {
    let total = |f: fn(&MonthAnalysis) -> f64| months.iter().map(f).sum::<f64>();

    let bench_budget_consumption = total(|m| m.bench_budget_consumption);
    let possible_value = total(|m| m.possible_value);
    let captured_value = total(|m| m.captured_value);

    YearAnalysis {
        months: months.len(),
        total_revenue: total(|m| m.total_revenue),
        total_cost: total(|m| m.total_cost),
        total_profit: total(|m| m.total_profit),
        bench_budget_consumption,
        bench_budget_utilisation: if config.total_bench_budget > 0.0 {
            bench_budget_consumption / config.total_bench_budget
        } else {
            0.0
        },
        possible_value,
        captured_value,
        lost_value: total(|m| m.lost_value),
        possible_value_demand: total(|m| m.possible_value_demand),
        captured_value_demand: total(|m| m.captured_value_demand),
        lost_value_demand: total(|m| m.lost_value_demand),
        possible_value_replacing: total(|m| m.possible_value_replacing),
        captured_value_replacing: total(|m| m.captured_value_replacing),
        lost_value_replacing: total(|m| m.lost_value_replacing),
        capture_rate: if possible_value > 0.0 { captured_value / possible_value } else { 1.0 },
    }
}

/// Mean of every monthly count across the year.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailsSummary {
    pub months:                usize,
    pub headcount:             f64,
    pub billable:              f64,
    pub bench:                 f64,
    pub new_hires:             f64,
    pub demanded:              f64,
    pub fulfilled:             f64,
    pub unfulfilled:           f64,
    pub resignations_billable: f64,
    pub resignations_bench:    f64,
    pub resignations_replaced: f64,
    pub planned_hires:         f64,
    pub bench_over_budget:     f64,
}

pub fn summarise_details(months: &[MonthDetails]) -> DetailsSummary {
    if months.is_empty() {
        return DetailsSummary::default();
    }
    let n = months.len() as f64;
    let mean = |f: fn(&MonthDetails) -> usize| months.iter().map(f).sum::<usize>() as f64 / n;

    DetailsSummary {
        months:                months.len(),
        headcount:             mean(|d| d.headcount),
        billable:              mean(|d| d.billable),
        bench:                 mean(|d| d.bench),
        new_hires:             mean(|d| d.new_hires),
        demanded:              mean(|d| d.demanded),
        fulfilled:             mean(|d| d.fulfilled),
        unfulfilled:           mean(|d| d.unfulfilled),
        resignations_billable: mean(|d| d.resignations_billable),
        resignations_bench:    mean(|d| d.resignations_bench),
        resignations_replaced: mean(|d| d.resignations_replaced),
        planned_hires:         mean(|d| d.planned_hires),
        bench_over_budget:     mean(|d| d.bench_over_budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> MonthDetails {
        MonthDetails {
            month:                 1,
            headcount:             100,
            billable:              85,
            bench:                 15,
            demanded:              5,
            fulfilled:             3,
            unfulfilled:           2,
            replacement_needed:    4,
            resignations_replaced: 1,
            ..MonthDetails::default()
        }
    }

    #[test]
    fn month_values_split_by_cause() {
        let a = analyse(&details(), &SimConfig::default());
        assert_eq!(a.total_revenue, 85.0 * 900.0);
        assert_eq!(a.total_cost, 100.0 * 685.0);
        assert_eq!(a.total_profit, a.total_revenue - a.total_cost);
        assert_eq!(a.bench_budget_consumption, 15.0 * 685.0);
        assert_eq!(a.lost_value_demand, 2.0 * 900.0);
        assert_eq!(a.lost_value_replacing, 3.0 * 900.0);
        assert_eq!(a.possible_value, a.captured_value + a.lost_value);
    }

    #[test]
    fn year_rolls_up_months() {
        let config = SimConfig::default();
        let month = analyse(&details(), &config);
        let year = analyse_year(&[month.clone(), month.clone()], &config);
        assert_eq!(year.months, 2);
        assert_eq!(year.total_profit, 2.0 * month.total_profit);
        assert_eq!(year.capture_rate, 4.0 / 9.0);
        assert_eq!(year.bench_budget_utilisation, 2.0 * 15.0 * 685.0 / 5_760_000.0);
    }

    #[test]
    fn empty_year_has_full_capture() {
        let year = analyse_year(&[], &SimConfig::default());
        assert_eq!(year.capture_rate, 1.0);
        assert_eq!(summarise_details(&[]).months, 0);
    }
}
