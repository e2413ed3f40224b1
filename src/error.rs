//! Error type for the public API

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("{periods} fixed periods but {rates} interest rates")]
    RateCountMismatch { periods: usize, rates: usize },

    #[error("interest rate is not a finite number: {0}")]
    NonFiniteRate(f64),

    #[error("step must be a positive finite number, got {0}")]
    InvalidStep(f64),

    #[error("mortgage not possible: periods sum to {periods_total} months, duration is {duration} months")]
    Infeasible { periods_total: u64, duration: u32 },

    #[error("burden never exceeds the reference below {upper}%")]
    NoBreakeven { upper: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, MortgageError>;
