//! Running state of an amortization across fixed periods

/// Loan state carried from one fixed period to the next
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Principal still outstanding at the start of the next period
    pub remaining_principal: f64,

    /// Months left until the end of the mortgage
    pub remaining_duration: u32,

    /// Payments accumulated so far, before truncation
    pub burden: f64,
}

impl AmortizationState {
    /// State at the start of the mortgage
    pub fn new(amount: u64, duration: u32) -> Self {
        Self {
            remaining_principal: amount as f64,
            remaining_duration: duration,
            burden: 0.0,
        }
    }

    /// Record a finished period: payments made and principal repaid
    pub fn advance(&mut self, months: u32, payment: f64, repaid: f64) {
        self.burden += payment * months as f64;
        self.remaining_principal -= repaid;
        self.remaining_duration -= months;
    }
}
