//! Run configuration — economics, attrition, and capacity ceilings.
//!
//! Loaded from `{data_dir}/config/simulation.json` or built from
//! `SimConfig::default()`, optionally patched by command-line
//! overrides, and always validated before an engine is built.

use crate::{
    error::{SimError, SimResult},
    types::{Month, HIRING_LEAD_TIME, HORIZON_MONTHS},
};
use serde::{Deserialize, Serialize};

/// Precedence between backfilling resigned billable employees and
/// serving newly arising demand when bench supply is scarce.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackfillPolicy {
    /// Resignation backfill consumes bench supply first.
    #[default]
    ReplacementFirst,
    /// New demand consumes bench supply first.
    DemandFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub revenue_per_billable: f64,
    pub cost_per_resource: f64,
    /// Bench spend allowed over the whole horizon.
    pub total_bench_budget: f64,
    /// Probability that an employee resigns in a given month.
    pub attrition_rate: f64,
    pub max_headcount: usize,
    pub notice_period: Month,
    /// Moving-average window of the demand forecaster.
    pub prev_months: usize,
    #[serde(default = "default_lead_time")]
    pub lead_time: Month,
    #[serde(default = "default_horizon")]
    pub horizon: Month,
    #[serde(default)]
    pub backfill_policy: BackfillPolicy,
}

fn default_lead_time() -> Month { HIRING_LEAD_TIME }
fn default_horizon() -> Month { HORIZON_MONTHS }

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            revenue_per_billable: 900.0,
            cost_per_resource:    685.0,
            total_bench_budget:   5_760_000.0,
            attrition_rate:       0.2,
            max_headcount:        12_000,
            notice_period:        2,
            prev_months:          3,
            lead_time:            HIRING_LEAD_TIME,
            horizon:              HORIZON_MONTHS,
            backfill_policy:      BackfillPolicy::ReplacementFirst,
        }
    }
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/config/simulation.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config sized for the in-code test dataset.
    pub fn default_test() -> Self {
        Self {
            revenue_per_billable: 900.0,
            cost_per_resource:    685.0,
            total_bench_budget:   12.0 * 685.0 * 40.0,
            attrition_rate:       0.05,
            max_headcount:        120,
            notice_period:        2,
            prev_months:          3,
            lead_time:            HIRING_LEAD_TIME,
            horizon:              HORIZON_MONTHS,
            backfill_policy:      BackfillPolicy::ReplacementFirst,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        positive_finite("revenue_per_billable", self.revenue_per_billable)?;
        positive_finite("cost_per_resource", self.cost_per_resource)?;
        if !self.total_bench_budget.is_finite() || self.total_bench_budget < 0.0 {
            return Err(SimError::config(
                "total_bench_budget",
                format!("must be a non-negative number, got {}", self.total_bench_budget),
            ));
        }
        if !(0.0..=1.0).contains(&self.attrition_rate) {
            return Err(SimError::config(
                "attrition_rate",
                format!("must be within [0, 1], got {}", self.attrition_rate),
            ));
        }
        if self.max_headcount == 0 {
            return Err(SimError::config("max_headcount", "must be at least 1"));
        }
        if self.lead_time != HIRING_LEAD_TIME {
            return Err(SimError::config(
                "lead_time",
                format!("fixed at {HIRING_LEAD_TIME} months, got {}", self.lead_time),
            ));
        }
        if self.horizon != HORIZON_MONTHS {
            return Err(SimError::config(
                "horizon",
                format!("fixed at {HORIZON_MONTHS} months, got {}", self.horizon),
            ));
        }
        if self.notice_period == 0 || self.notice_period > self.horizon {
            return Err(SimError::config(
                "notice_period",
                format!("must be within 1..={}, got {}", self.horizon, self.notice_period),
            ));
        }
        if self.prev_months == 0 || self.prev_months > self.horizon as usize {
            return Err(SimError::config(
                "prev_months",
                format!("must be within 1..={}, got {}", self.horizon, self.prev_months),
            ));
        }
        Ok(())
    }

    /// Bench spend allowed per month.
    pub fn monthly_bench_budget(&self) -> f64 {
        self.total_bench_budget / self.horizon as f64
    }

    /// Idle headcount the monthly bench budget can carry.
    pub fn bench_capacity(&self) -> usize {
        (self.monthly_bench_budget() / self.cost_per_resource).floor() as usize
    }
}

fn positive_finite(field: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must be a positive number, got {value}")))
    }
}

/// Raw override strings as received on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub billable_revenue:  Option<String>,
    pub cost_per_resource: Option<String>,
    pub attrition:         Option<String>,
    pub maximum_strength:  Option<String>,
}

impl ConfigOverrides {
    /// Parse and apply every present override, then re-validate.
    /// The config is left untouched when any override is rejected.
    pub fn apply_to(&self, config: &SimConfig) -> SimResult<SimConfig> {
        let mut patched = config.clone();

        if let Some(raw) = &self.billable_revenue {
            patched.revenue_per_billable = parse_number("billable_revenue", raw)?;
        }
        if let Some(raw) = &self.cost_per_resource {
            patched.cost_per_resource = parse_number("cost_per_resource", raw)?;
        }
        if let Some(raw) = &self.attrition {
            patched.attrition_rate = parse_number("attrition", raw)?;
        }
        if let Some(raw) = &self.maximum_strength {
            let value = parse_number("maximum_strength", raw)?;
            if value < 1.0 || value.fract() != 0.0 {
                return Err(SimError::config(
                    "maximum_strength",
                    format!("must be a whole number of at least 1, got {raw}"),
                ));
            }
            patched.max_headcount = value as usize;
        }

        patched.validate()?;
        Ok(patched)
    }
}

fn parse_number(field: &str, raw: &str) -> SimResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| SimError::config(field, format!("not a number: {raw:?}")))?;
    if !value.is_finite() {
        return Err(SimError::config(field, format!("not a finite number: {raw:?}")));
    }
    Ok(value)
}
