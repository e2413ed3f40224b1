//! Mortgage Planner - amortization schedules for multi-period fixed-rate mortgages
//!
//! This library provides:
//! - Annuity-based amortization across consecutive fixed-rate periods
//! - Combining several mortgages with different period boundaries
//! - Sweeps over the unknown future rate and breakeven-rate searches
//! - Plot-ready chart data and CSV loading of mortgage definitions

pub mod error;
pub mod schedule;
pub mod amortization;
pub mod scenario;
pub mod report;
pub mod loader;

// Re-export commonly used types
pub use error::{MortgageError, Result};
pub use schedule::{MortgageSchedule, Segment, combine, combine_all};
pub use amortization::{compute, AmortizationEngine, MortgageTerms};
pub use scenario::{sweep, find_breakeven_rate, Breakeven, ScenarioConfig, ScenarioRunner};
