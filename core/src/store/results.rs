//! Store methods for per-month planner output and the year summary.

use crate::{
    analysis::{DetailsSummary, MonthAnalysis, YearAnalysis},
    employee::Employee,
    error::{SimError, SimResult},
    pipeline::HireRequisition,
    planner::MonthDetails,
    types::{EmployeeId, Month},
};
use rusqlite::{params, OptionalExtension};

use super::SimStore;

/// Which list a roster row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    ResigningBillable,
    ResigningBench,
    Billable,
    Bench,
}

impl RosterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResigningBillable => "resigning_billable",
            Self::ResigningBench    => "resigning_bench",
            Self::Billable          => "billable",
            Self::Bench             => "bench",
        }
    }
}

impl SimStore {
    pub fn insert_month_details(&self, run_id: &str, d: &MonthDetails) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO month_details (
                run_id, month, headcount, billable, bench, new_hires, demanded,
                fulfilled, unfulfilled, resignations_billable, resignations_bench,
                resignations_replaced, planned_hires, hiring_shortfall,
                bench_over_budget, record_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                run_id,
                d.month as i64,
                d.headcount as i64,
                d.billable as i64,
                d.bench as i64,
                d.new_hires as i64,
                d.demanded as i64,
                d.fulfilled as i64,
                d.unfulfilled as i64,
                d.resignations_billable as i64,
                d.resignations_bench as i64,
                d.resignations_replaced as i64,
                d.planned_hires as i64,
                d.hiring_shortfall as i64,
                d.bench_over_budget as i64,
                serde_json::to_string(d)?,
            ],
        )?;
        Ok(())
    }

    pub fn insert_month_analysis(&self, run_id: &str, a: &MonthAnalysis) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO month_analysis (
                run_id, month, total_revenue, total_cost, total_profit,
                captured_value, lost_value, record_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                run_id,
                a.month as i64,
                a.total_revenue,
                a.total_cost,
                a.total_profit,
                a.captured_value,
                a.lost_value,
                serde_json::to_string(a)?,
            ],
        )?;
        Ok(())
    }

    pub fn insert_roster(
        &self,
        run_id: &str,
        month: Month,
        kind: RosterKind,
        employees: &[Employee],
    ) -> SimResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO roster (run_id, month, kind, position, employee_id, skills, assigned_skill)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, e) in employees.iter().enumerate() {
            stmt.execute(params![
                run_id,
                month as i64,
                kind.as_str(),
                position as i64,
                e.id,
                e.skills.join(";"),
                e.assigned_skill,
            ])?;
        }
        Ok(())
    }

    pub fn insert_requisitions(&self, run_id: &str, batch: &[HireRequisition]) -> SimResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO hire_requisition (run_id, requisition_id, skill, issued_month, arrival_month)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for r in batch {
            stmt.execute(params![
                run_id,
                r.requisition_id,
                r.skill,
                r.issued_month as i64,
                r.arrival_month as i64,
            ])?;
        }
        Ok(())
    }

    pub fn save_year_summary(
        &self,
        run_id: &str,
        details: &DetailsSummary,
        analysis: &YearAnalysis,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO year_summary (run_id, details_json, analysis_json)
             VALUES (?1, ?2, ?3)",
            params![
                run_id,
                serde_json::to_string(details)?,
                serde_json::to_string(analysis)?,
            ],
        )?;
        Ok(())
    }

    // ── Readers ───────────────────────────────────────────────────────

    pub fn month_details(&self, run_id: &str) -> SimResult<Vec<MonthDetails>> {
        let mut stmt = self.conn.prepare(
            "SELECT record_json FROM month_details WHERE run_id = ?1 ORDER BY month ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(SimError::from))
            .collect()
    }

    /// Months whose idle bench exceeded the budget, with the overrun.
    pub fn months_over_bench_budget(&self, run_id: &str) -> SimResult<Vec<(Month, usize)>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, bench_over_budget FROM month_details
             WHERE run_id = ?1 AND bench_over_budget > 0
             ORDER BY month ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, i64>(0)? as Month, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn month_analysis(&self, run_id: &str) -> SimResult<Vec<MonthAnalysis>> {
        let mut stmt = self.conn.prepare(
            "SELECT record_json FROM month_analysis WHERE run_id = ?1 ORDER BY month ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(SimError::from))
            .collect()
    }

    pub fn roster(&self, run_id: &str, month: Month, kind: RosterKind) -> SimResult<Vec<EmployeeId>> {
        let mut stmt = self.conn.prepare(
            "SELECT employee_id FROM roster
             WHERE run_id = ?1 AND month = ?2 AND kind = ?3
             ORDER BY position ASC",
        )?;
        let ids = stmt
            .query_map(params![run_id, month as i64, kind.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    pub fn requisitions_issued(&self, run_id: &str, month: Month) -> SimResult<Vec<HireRequisition>> {
        let mut stmt = self.conn.prepare(
            "SELECT requisition_id, skill, issued_month, arrival_month FROM hire_requisition
             WHERE run_id = ?1 AND issued_month = ?2
             ORDER BY requisition_id ASC",
        )?;
        let batch = stmt
            .query_map(params![run_id, month as i64], |row| {
                Ok(HireRequisition {
                    requisition_id: row.get(0)?,
                    skill:          row.get(1)?,
                    issued_month:   row.get::<_, i64>(2)? as Month,
                    arrival_month:  row.get::<_, i64>(3)? as Month,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batch)
    }

    pub fn year_summary(&self, run_id: &str) -> SimResult<Option<(DetailsSummary, YearAnalysis)>> {
        let row = self
            .conn
            .query_row(
                "SELECT details_json, analysis_json FROM year_summary WHERE run_id = ?1",
                params![run_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        match row {
            Some((details, analysis)) => Ok(Some((
                serde_json::from_str(&details)?,
                serde_json::from_str(&analysis)?,
            ))),
            None => Ok(None),
        }
    }
}
