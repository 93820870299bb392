//! Input dataset — opening headcount and last year's demand trend.
//!
//! Loaded from `{data_dir}/dataset/headcount.json` and
//! `{data_dir}/dataset/demand_trend.json`, then reshaped into the
//! typed structures the engine runs on. Schema problems are fatal
//! here; nothing downstream repairs input.

use crate::{
    demand::{SkillDemandVector, SkillSchema},
    employee::{Employee, EmployeePool, EmployeeStatus},
    error::{SimError, SimResult},
    types::{EmployeeId, Skill, HORIZON_MONTHS},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadcountRecord {
    pub employee_id: EmployeeId,
    pub skills:      Vec<Skill>,
    pub status:      EmployeeStatus,
}

/// One skill's demand over each month of the reference year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendRecord {
    pub skill:   Skill,
    pub monthly: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct HeadcountFile {
    employees: Vec<HeadcountRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct DemandTrendFile {
    skills: Vec<TrendRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub headcount:    Vec<HeadcountRecord>,
    pub demand_trend: Vec<TrendRecord>,
}

impl Dataset {
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let headcount_path = format!("{data_dir}/dataset/headcount.json");
        let headcount_content = std::fs::read_to_string(&headcount_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {headcount_path}: {e}"))?;
        let headcount_file: HeadcountFile = serde_json::from_str(&headcount_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {headcount_path}: {e}"))?;

        let trend_path = format!("{data_dir}/dataset/demand_trend.json");
        let trend_content = std::fs::read_to_string(&trend_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {trend_path}: {e}"))?;
        let trend_file: DemandTrendFile = serde_json::from_str(&trend_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {trend_path}: {e}"))?;

        Ok(Self {
            headcount:    headcount_file.employees,
            demand_trend: trend_file.skills,
        })
    }

    /// Three-skill dataset with growing java demand, for tests.
    pub fn default_test() -> Self {
        let mut headcount = Vec::new();
        let mut push = |skills: &[&str], status: EmployeeStatus, n: usize| {
            for _ in 0..n {
                headcount.push(HeadcountRecord {
                    employee_id: format!("E{:04}", headcount.len() + 1),
                    skills:      skills.iter().map(|s| s.to_string()).collect(),
                    status,
                });
            }
        };
        push(&["java"], EmployeeStatus::Billable, 30);
        push(&["python"], EmployeeStatus::Billable, 20);
        push(&["sql"], EmployeeStatus::Billable, 10);
        push(&["java", "sql"], EmployeeStatus::Billable, 4);
        push(&["java"], EmployeeStatus::Bench, 5);
        push(&["python", "sql"], EmployeeStatus::Bench, 4);
        push(&["sql"], EmployeeStatus::Bench, 3);

        let demand_trend = vec![
            TrendRecord { skill: "java".into(),   monthly: (0..12).map(|m| 34 + m).collect() },
            TrendRecord { skill: "python".into(), monthly: vec![20, 20, 21, 22, 22, 23, 24, 24, 25, 26, 26, 27] },
            TrendRecord { skill: "sql".into(),    monthly: vec![10; 12] },
        ];

        Self { headcount, demand_trend }
    }

    /// One skill, constant demand, all billable employees billed on it.
    pub fn single_skill(skill: &str, billable: usize, bench: usize, monthly_demand: u32) -> Self {
        let record = |i: usize, status| HeadcountRecord {
            employee_id: format!("E{:05}", i + 1),
            skills:      vec![skill.to_string()],
            status,
        };
        let headcount = (0..billable)
            .map(|i| record(i, EmployeeStatus::Billable))
            .chain((billable..billable + bench).map(|i| record(i, EmployeeStatus::Bench)))
            .collect();

        Self {
            headcount,
            demand_trend: vec![TrendRecord {
                skill:   skill.to_string(),
                monthly: vec![monthly_demand; HORIZON_MONTHS as usize],
            }],
        }
    }
}

/// Reshape the per-skill trend into one demand vector per month plus
/// the skill schema.
pub fn build_monthly_trends(
    trend: &[TrendRecord],
) -> SimResult<(Vec<SkillDemandVector>, SkillSchema)> {
    let schema = SkillSchema::new(trend.iter().map(|t| t.skill.clone()).collect())?;

    for record in trend {
        if record.monthly.len() != HORIZON_MONTHS as usize {
            return Err(SimError::schema(format!(
                "demand trend for {:?} has {} months, expected {HORIZON_MONTHS}",
                record.skill,
                record.monthly.len()
            )));
        }
    }

    let rows = (0..HORIZON_MONTHS as usize)
        .map(|m| schema.vector(trend.iter().map(|t| (t.skill.as_str(), t.monthly[m]))))
        .collect::<SimResult<Vec<_>>>()?;

    Ok((rows, schema))
}

/// Split headcount into the billable and bench pools. Billable
/// employees are billed on their first listed skill.
pub fn split(
    headcount: &[HeadcountRecord],
    schema: &SkillSchema,
) -> SimResult<(EmployeePool, EmployeePool)> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut billable = EmployeePool::new();
    let mut bench = EmployeePool::new();

    for record in headcount {
        let id = record.employee_id.as_str();
        if id.trim().is_empty() {
            return Err(SimError::schema("headcount row with empty employee_id"));
        }
        if !seen.insert(id) {
            return Err(SimError::schema(format!("duplicate employee_id {id:?}")));
        }
        let Some(primary) = record.skills.first() else {
            return Err(SimError::schema(format!("employee {id:?} has no skills")));
        };
        if let Some(unknown) = record.skills.iter().find(|s| !schema.contains(s)) {
            return Err(SimError::schema(format!(
                "employee {id:?} lists skill {unknown:?} absent from the demand trend"
            )));
        }

        match record.status {
            EmployeeStatus::Billable => billable.push(Employee::billable(
                id,
                record.skills.clone(),
                primary.clone(),
                0,
            )),
            EmployeeStatus::Bench => bench.push(Employee::bench(id, record.skills.clone(), 0)),
        }
    }

    Ok((billable, bench))
}
