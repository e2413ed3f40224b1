//! Annuity formulas for a loan at a fixed monthly rate
//!
//! Rates enter as annual percentages (e.g. 2.1 for 2.1%) and are converted
//! to monthly decimal rates before use.

/// Convert an annual percentage rate to a monthly decimal rate
pub fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / 12.0
}

/// Level monthly payment that repays `principal` over `months` at `monthly_rate`
///
/// A zero rate degenerates to linear repayment. `months` must be positive.
pub fn annuity_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        principal / months as f64
    } else {
        monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(months as i32))) * principal
    }
}

/// Principal repaid during the first `months` payments of an annuity
///
/// Each month's repayment is the payment minus the interest on the outstanding
/// principal, so repayments grow geometrically by `1 + monthly_rate`. The sum
/// uses the closed form of that geometric series.
pub fn principal_repaid(principal: f64, payment: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        payment * months as f64
    } else {
        let first_repayment = payment - principal * monthly_rate;
        let ratio = 1.0 + monthly_rate;
        first_repayment * (ratio.powi(months as i32) - 1.0) / (ratio - 1.0)
    }
}
