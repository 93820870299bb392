//! Demand forecasting — skill schema, demand vectors, observed history,
//! and the moving-average forecaster.
//!
//! The forecaster is a pure function of the history it is handed: it
//! never writes to it and never looks at rows at or after the month
//! it is forecasting.

use crate::{
    error::{SimError, SimResult},
    types::{Month, Skill, HIRING_LEAD_TIME},
};
use serde::{Deserialize, Serialize};

// ── Skill schema ─────────────────────────────────────────────────────────────

/// The ordered set of skills known to the run, taken from the demand
/// trend. Demand vectors and employee skills are validated against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillSchema {
    skills: Vec<Skill>,
}

impl SkillSchema {
    pub fn new(skills: Vec<Skill>) -> SimResult<Self> {
        if skills.is_empty() {
            return Err(SimError::schema("demand trend defines no skills"));
        }
        for (i, skill) in skills.iter().enumerate() {
            if skill.trim().is_empty() {
                return Err(SimError::schema("blank skill label in demand trend"));
            }
            if skills[..i].contains(skill) {
                return Err(SimError::schema(format!("duplicate skill {skill:?} in demand trend")));
            }
        }
        Ok(Self { skills })
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Build a demand vector. Skills left out count as zero; skills
    /// outside the schema are rejected.
    pub fn vector<S, I>(&self, counts: I) -> SimResult<SkillDemandVector>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, u32)>,
    {
        let mut values = vec![0u32; self.skills.len()];
        for (skill, count) in counts {
            let skill = skill.as_ref();
            let idx = self
                .skills
                .iter()
                .position(|s| s == skill)
                .ok_or_else(|| SimError::schema(format!("unknown skill {skill:?}")))?;
            values[idx] = count;
        }
        Ok(self.from_values(values))
    }

    /// Same count for every skill.
    pub fn uniform(&self, count: u32) -> SkillDemandVector {
        self.from_values(vec![count; self.skills.len()])
    }

    fn from_values(&self, values: Vec<u32>) -> SkillDemandVector {
        SkillDemandVector {
            counts: self.skills.iter().cloned().zip(values).collect(),
        }
    }
}

// ── Demand vector ────────────────────────────────────────────────────────────

/// Required headcount per skill for one month, in schema order.
/// Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillDemandVector {
    counts: Vec<(Skill, u32)>,
}

impl SkillDemandVector {
    pub fn get(&self, skill: &str) -> u32 {
        self.counts
            .iter()
            .find(|(s, _)| s == skill)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(s, c)| (s.as_str(), *c))
    }
}

// ── Observed history ─────────────────────────────────────────────────────────

/// Append-only record of observed demand, one row per month.
/// Row `month - 1` is written exactly once, while `month` is processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemandHistory {
    rows: Vec<Option<SkillDemandVector>>,
}

impl DemandHistory {
    pub fn new(horizon: Month) -> Self {
        Self { rows: vec![None; horizon as usize] }
    }

    pub fn horizon(&self) -> Month {
        self.rows.len() as Month
    }

    pub fn record(&mut self, month: Month, demand: SkillDemandVector) -> SimResult<()> {
        let horizon = self.horizon();
        if month == 0 || month > horizon {
            return Err(SimError::HorizonExceeded { month, horizon });
        }
        let row = &mut self.rows[(month - 1) as usize];
        if row.is_some() {
            return Err(SimError::HistoryOverwrite { month });
        }
        *row = Some(demand);
        Ok(())
    }

    pub fn observed(&self, month: Month) -> Option<&SkillDemandVector> {
        if month == 0 {
            return None;
        }
        self.rows.get((month - 1) as usize).and_then(Option::as_ref)
    }

    pub fn written_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Contiguous observed rows for months `1..=month`.
    pub fn observed_through(&self, month: Month) -> Vec<&SkillDemandVector> {
        self.rows
            .iter()
            .take(month as usize)
            .map_while(Option::as_ref)
            .collect()
    }
}

// ── Forecaster ───────────────────────────────────────────────────────────────

pub struct DemandModel {
    schema:      SkillSchema,
    /// Seed trend, one row per month of the reference year.
    trend:       Vec<SkillDemandVector>,
    prev_months: usize,
}

impl DemandModel {
    pub fn new(
        schema: SkillSchema,
        trend: Vec<SkillDemandVector>,
        prev_months: usize,
    ) -> SimResult<Self> {
        if trend.is_empty() {
            return Err(SimError::schema("demand trend has no monthly rows"));
        }
        if prev_months == 0 {
            return Err(SimError::config("prev_months", "must be at least 1"));
        }
        Ok(Self { schema, trend, prev_months })
    }

    pub fn schema(&self) -> &SkillSchema {
        &self.schema
    }

    pub fn prev_months(&self) -> usize {
        self.prev_months
    }

    /// Demand for `month`. Cold start (fewer than `prev_months` observed
    /// months before it) falls back to the seed trend; afterwards the
    /// moving average of the last `prev_months` observed months.
    pub fn predict_demand(&self, history: &DemandHistory, month: Month) -> SkillDemandVector {
        let window = history.observed_through(month.saturating_sub(1));
        self.forecast(&window, month)
    }

    /// Demand expected at `month + lead time`, sizing requisitions issued
    /// now. Uses observations up to and including `month`.
    pub fn predict_demand_in_2_months(
        &self,
        history: &DemandHistory,
        month: Month,
    ) -> SkillDemandVector {
        let window = history.observed_through(month);
        self.forecast(&window, month + HIRING_LEAD_TIME)
    }

    fn forecast(&self, window: &[&SkillDemandVector], target: Month) -> SkillDemandVector {
        if window.len() < self.prev_months {
            return self.trend_row(target);
        }
        self.moving_average(&window[window.len() - self.prev_months..])
    }

    /// Seed trend for `month`, wrapping over the reference year.
    pub fn trend_row(&self, month: Month) -> SkillDemandVector {
        let idx = (month.max(1) as usize - 1) % self.trend.len();
        self.trend[idx].clone()
    }

    fn moving_average(&self, rows: &[&SkillDemandVector]) -> SkillDemandVector {
        let n = rows.len() as f64;
        let values = self
            .schema
            .skills()
            .iter()
            .map(|skill| {
                let sum: u64 = rows.iter().map(|r| r.get(skill) as u64).sum();
                (sum as f64 / n).round() as u32
            })
            .collect();
        self.schema.from_values(values)
    }
}
