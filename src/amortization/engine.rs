//! Amortization of a mortgage made of consecutive fixed-rate periods
//!
//! At the start of every fixed period the payment is recomputed as if the
//! remaining principal were refinanced over the remaining duration at that
//! period's rate. Only the principal actually repaid within the period is
//! carried into the next one.

use serde::{Deserialize, Serialize};

use super::annuity::{annuity_payment, monthly_rate, principal_repaid};
use super::state::AmortizationState;
use crate::error::{MortgageError, Result};
use crate::schedule::MortgageSchedule;

/// Default mortgage duration in months (30 years)
pub const DEFAULT_DURATION_MONTHS: u32 = 360;

/// Default label for a computed mortgage
pub const DEFAULT_LABEL: &str = "Mortgage";

/// Definition of a mortgage: fixed periods, their rates, amount and duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Fixed-rate period lengths in months, in chronological order
    pub periods: Vec<u32>,

    /// Annual interest rate in percent for each period
    pub rates: Vec<f64>,

    /// Loan amount
    pub amount: u64,

    /// Total duration in months
    pub duration: u32,

    pub label: String,
}

impl MortgageTerms {
    pub fn new(periods: Vec<u32>, rates: Vec<f64>, amount: u64) -> Self {
        Self {
            periods,
            rates,
            amount,
            duration: DEFAULT_DURATION_MONTHS,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Same terms with `last_rate` as the rate of the final period
    ///
    /// `rates` may hold every rate but the last (the candidate is appended)
    /// or one rate per period (the last one is replaced). More rates than
    /// periods is a [`MortgageError::RateCountMismatch`].
    pub fn with_future_rate(&self, last_rate: f64) -> Result<Self> {
        if self.rates.len() > self.periods.len() {
            return Err(MortgageError::RateCountMismatch {
                periods: self.periods.len(),
                rates: self.rates.len(),
            });
        }
        let mut terms = self.clone();
        terms.rates.truncate(terms.periods.len().saturating_sub(1));
        terms.rates.push(last_rate);
        Ok(terms)
    }

    /// Sum of all fixed period lengths
    pub fn periods_total(&self) -> u64 {
        self.periods.iter().map(|&p| u64::from(p)).sum()
    }

    /// Whether the fixed periods exactly cover the duration
    pub fn is_feasible(&self) -> bool {
        self.periods_total() == u64::from(self.duration)
    }

    /// Diagnostic for periods that do not cover the duration
    pub fn infeasibility(&self) -> Option<MortgageError> {
        if self.is_feasible() {
            None
        } else {
            Some(MortgageError::Infeasible {
                periods_total: self.periods_total(),
                duration: self.duration,
            })
        }
    }

    /// Check the preconditions that make the terms computable at all
    pub fn validate(&self) -> Result<()> {
        if self.periods.len() != self.rates.len() {
            return Err(MortgageError::RateCountMismatch {
                periods: self.periods.len(),
                rates: self.rates.len(),
            });
        }
        if let Some(&rate) = self.rates.iter().find(|r| !r.is_finite()) {
            return Err(MortgageError::NonFiniteRate(rate));
        }
        Ok(())
    }

    /// Run the amortization for these terms
    pub fn compute(&self) -> Result<MortgageSchedule> {
        AmortizationEngine::new(self.clone()).run()
    }
}

/// Amortization engine for a single mortgage
pub struct AmortizationEngine {
    terms: MortgageTerms,
}

impl AmortizationEngine {
    pub fn new(terms: MortgageTerms) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &MortgageTerms {
        &self.terms
    }

    /// Compute the schedule
    ///
    /// Returns `Err` only for malformed terms (rate count mismatch, non-finite
    /// rate). Periods that do not add up to the duration are not an error: a
    /// diagnostic is logged and [`MortgageSchedule::impossible`] is returned.
    pub fn run(&self) -> Result<MortgageSchedule> {
        self.terms.validate()?;

        if let Some(diagnostic) = self.terms.infeasibility() {
            log::error!("{}", diagnostic);
            return Ok(MortgageSchedule::impossible());
        }

        let (segments, state) = self.amortize();

        log::debug!(
            "{}: burden {:.2}, remaining principal {:.6}",
            self.terms.label,
            state.burden,
            state.remaining_principal
        );

        Ok(MortgageSchedule::from_unrounded(
            self.terms.label.clone(),
            self.terms.amount,
            state.burden,
            &segments,
        ))
    }

    /// Walk the fixed periods, returning full-precision payments and the final state
    fn amortize(&self) -> (Vec<(u32, f64)>, AmortizationState) {
        let mut state = AmortizationState::new(self.terms.amount, self.terms.duration);
        let mut segments = Vec::with_capacity(self.terms.periods.len());

        for (&months, &rate) in self.terms.periods.iter().zip(&self.terms.rates) {
            // Zero-length periods cover no months
            if months == 0 {
                continue;
            }

            let monthly = monthly_rate(rate);
            let payment = annuity_payment(state.remaining_principal, monthly, state.remaining_duration);
            let repaid = principal_repaid(state.remaining_principal, payment, monthly, months);

            log::debug!(
                "{} months at {}%: payment {:.2}, repaid {:.2} of {:.2}",
                months,
                rate,
                payment,
                repaid,
                state.remaining_principal
            );

            segments.push((months, payment));
            state.advance(months, payment, repaid);
        }

        (segments, state)
    }
}

/// Compute the schedule of a mortgage
///
/// See [`AmortizationEngine::run`] for the failure contract.
pub fn compute(periods: &[u32], rates: &[f64], amount: u64, duration: u32, label: &str) -> Result<MortgageSchedule> {
    MortgageTerms::new(periods.to_vec(), rates.to_vec(), amount)
        .with_duration(duration)
        .with_label(label)
        .compute()
}
