//! Workforce supply–demand simulation core.
//!
//! Simulates one year, month by month, of billable and benched
//! employees against project demand, with notice-period attrition and
//! a two-month hiring pipeline. `engine::SimEngine` is the entry point.

pub mod analysis;
pub mod attrition;
pub mod clock;
pub mod config;
pub mod dataset;
pub mod demand;
pub mod employee;
pub mod engine;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod planner;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
