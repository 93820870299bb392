//! Employees and the pools that own them.
//!
//! Every active employee is held by exactly one pool: billable or
//! bench. Moving between pools goes through `assign` / `release` so
//! the status field always matches the owning pool.

use crate::types::{EmployeeId, Month, Skill};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Billable,
    Bench,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Billable => "billable",
            Self::Bench    => "bench",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id:             EmployeeId,
    /// Never empty; validated against the skill schema at load.
    pub skills:         Vec<Skill>,
    pub status:         EmployeeStatus,
    /// 0 for the opening workforce.
    pub joined_month:   Month,
    /// Skill a billable employee is billed on.
    pub assigned_skill: Option<Skill>,
    pub assigned_month: Option<Month>,
}

impl Employee {
    pub fn bench(id: impl Into<EmployeeId>, skills: Vec<Skill>, joined_month: Month) -> Self {
        Self {
            id: id.into(),
            skills,
            status: EmployeeStatus::Bench,
            joined_month,
            assigned_skill: None,
            assigned_month: None,
        }
    }

    pub fn billable(
        id: impl Into<EmployeeId>,
        skills: Vec<Skill>,
        assigned_skill: Skill,
        joined_month: Month,
    ) -> Self {
        Self {
            id: id.into(),
            skills,
            status: EmployeeStatus::Billable,
            joined_month,
            assigned_skill: Some(assigned_skill),
            assigned_month: Some(joined_month),
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn is_assigned_to(&self, skill: &str) -> bool {
        self.assigned_skill.as_deref() == Some(skill)
    }

    /// Move onto billable work for `skill`.
    pub fn assign(&mut self, skill: &str, month: Month) {
        self.status = EmployeeStatus::Billable;
        self.assigned_skill = Some(skill.to_string());
        self.assigned_month = Some(month);
    }

    /// Roll off billable work back to the bench.
    pub fn release(&mut self) {
        self.status = EmployeeStatus::Bench;
        self.assigned_skill = None;
    }
}

/// An ordered set of employees. Order is insertion order and is part
/// of the deterministic contract: matching always scans front to back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EmployeePool {
    employees: Vec<Employee>,
}

impl EmployeePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn as_slice(&self) -> &[Employee] {
        &self.employees
    }

    pub fn contains(&self, id: &str) -> bool {
        self.employees.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<EmployeeId> {
        self.employees.iter().map(|e| e.id.clone()).collect()
    }

    pub fn push(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    /// Remove every employee whose id is in `ids`, keeping pool order
    /// in the returned list. Unknown ids are ignored.
    pub fn remove_many(&mut self, ids: &[EmployeeId]) -> Vec<Employee> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.employees)
            .into_iter()
            .partition(|e| ids.contains(&e.id));
        self.employees = kept;
        removed
    }

    /// Billable headcount currently billed on `skill`.
    pub fn count_assigned(&self, skill: &str) -> usize {
        self.employees.iter().filter(|e| e.is_assigned_to(skill)).count()
    }

    /// Take the bench candidate best suited to `skill`: holders of fewer
    /// skills first so versatile employees stay available, then the one
    /// who has waited longest.
    pub fn take_best_match(&mut self, skill: &str) -> Option<Employee> {
        let idx = self
            .employees
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_skill(skill))
            .min_by_key(|(i, e)| (e.skills.len(), *i))
            .map(|(i, _)| i)?;
        Some(self.employees.remove(idx))
    }

    /// Take the most recently assigned employee billed on `skill`.
    pub fn take_latest_assigned(&mut self, skill: &str) -> Option<Employee> {
        let idx = self
            .employees
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_assigned_to(skill))
            .max_by_key(|(i, e)| (e.assigned_month.unwrap_or(0), *i))
            .map(|(i, _)| i)?;
        Some(self.employees.remove(idx))
    }
}

impl FromIterator<Employee> for EmployeePool {
    fn from_iter<I: IntoIterator<Item = Employee>>(iter: I) -> Self {
        Self { employees: iter.into_iter().collect() }
    }
}

impl IntoIterator for EmployeePool {
    type Item = Employee;
    type IntoIter = std::vec::IntoIter<Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.into_iter()
    }
}

impl<'a> IntoIterator for &'a EmployeePool {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<Skill> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn best_match_prefers_specialists() {
        let mut pool: EmployeePool = vec![
            Employee::bench("E1", skills(&["java", "sql"]), 0),
            Employee::bench("E2", skills(&["java"]), 0),
            Employee::bench("E3", skills(&["java"]), 0),
        ]
        .into_iter()
        .collect();

        let picked = pool.take_best_match("java").unwrap();
        assert_eq!(picked.id, "E2");
        assert_eq!(pool.ids(), vec!["E1".to_string(), "E3".to_string()]);
        assert!(pool.take_best_match("python").is_none());
    }

    #[test]
    fn latest_assigned_rolls_off_first() {
        let mut pool = EmployeePool::new();
        pool.push(Employee::billable("A", skills(&["java"]), "java".into(), 0));
        let mut late = Employee::bench("B", skills(&["java"]), 0);
        late.assign("java", 3);
        pool.push(late);
        pool.push(Employee::billable("C", skills(&["java"]), "java".into(), 0));

        assert_eq!(pool.take_latest_assigned("java").unwrap().id, "B");
        assert_eq!(pool.take_latest_assigned("java").unwrap().id, "C");
    }

    #[test]
    fn remove_many_keeps_order() {
        let mut pool: EmployeePool = ["A", "B", "C", "D"]
            .iter()
            .map(|id| Employee::bench(*id, skills(&["go"]), 0))
            .collect();
        let removed = pool.remove_many(&["D".to_string(), "B".to_string(), "Z".to_string()]);
        let removed_ids: Vec<_> = removed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(removed_ids, vec!["B", "D"]);
        assert_eq!(pool.len(), 2);
    }
}
