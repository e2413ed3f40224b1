//! Amortization engine for multi-period fixed-rate mortgages

mod state;
mod engine;
pub mod annuity;

pub use state::AmortizationState;
pub use engine::{compute, AmortizationEngine, MortgageTerms, DEFAULT_DURATION_MONTHS, DEFAULT_LABEL};
pub use annuity::{annuity_payment, monthly_rate, principal_repaid};
