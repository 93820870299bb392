//! Shared primitive types used across the entire simulation.

/// A simulation month. Month 1 is the first simulated month; 0 is the
/// opening position before the year starts.
pub type Month = u32;

/// A stable, unique identifier for an employee.
pub type EmployeeId = String;

/// A skill label as it appears in the demand trend.
pub type Skill = String;

/// The canonical run identifier.
pub type RunId = String;

/// Months in one simulated year.
pub const HORIZON_MONTHS: Month = 12;

/// Delay between issuing a hiring requisition and the hire arriving.
pub const HIRING_LEAD_TIME: Month = 2;
