//! Mortgage schedule: totals plus the monthly payment of each fixed period

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label carried by the schedule returned for an infeasible mortgage
pub const IMPOSSIBLE_LABEL: &str = "Impossible mortgage";

/// A run of consecutive months paying the same monthly amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Length of the segment in months
    pub months: u32,

    /// Monthly payment, truncated to whole currency units
    pub payment: u64,
}

impl Segment {
    pub fn new(months: u32, payment: u64) -> Self {
        Self { months, payment }
    }

    /// Total paid over the segment using the truncated payment
    pub fn total_paid(&self) -> u64 {
        self.months as u64 * self.payment
    }
}

/// Total burden and per-period monthly payments of one or more mortgages
///
/// Built once by the amortization engine or by combining two schedules.
/// All monetary amounts are truncated to integers at construction and never
/// re-derived afterwards, so combining schedules adds the truncated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageSchedule {
    label: String,
    total_amount: u64,
    total_burden: u64,
    segments: Vec<Segment>,
}

impl MortgageSchedule {
    /// Build a schedule from already truncated values
    pub fn new(label: impl Into<String>, total_amount: u64, total_burden: u64, segments: Vec<Segment>) -> Self {
        Self {
            label: label.into(),
            total_amount,
            total_burden,
            segments,
        }
    }

    /// Build a schedule from full-precision engine output, truncating every amount
    ///
    /// Negative amounts truncate to zero.
    pub fn from_unrounded(label: impl Into<String>, total_amount: u64, total_burden: f64, segments: &[(u32, f64)]) -> Self {
        Self {
            label: label.into(),
            total_amount,
            total_burden: total_burden as u64,
            segments: segments
                .iter()
                .map(|&(months, payment)| Segment::new(months, payment as u64))
                .collect(),
        }
    }

    /// The schedule returned when the periods do not cover the duration
    pub fn impossible() -> Self {
        Self::new(IMPOSSIBLE_LABEL, 0, 0, Vec::new())
    }

    /// True for a schedule with no amount, no burden and no segments
    ///
    /// Such a schedule is the identity element of combination.
    pub fn is_empty(&self) -> bool {
        self.total_amount == 0 && self.total_burden == 0 && self.segments.is_empty()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Original principal
    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    /// Principal plus all interest paid
    pub fn total_burden(&self) -> u64 {
        self.total_burden
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total length of all segments in months
    pub fn duration(&self) -> u32 {
        self.segments.iter().map(|s| s.months).sum()
    }

    /// Monthly payment of the last segment, if any
    pub fn last_payment(&self) -> Option<u64> {
        self.segments.last().map(|s| s.payment)
    }

    /// Sum of `months * payment` over the truncated segments
    ///
    /// Generally a little below `total_burden`, which is accumulated before truncation.
    pub fn segment_total(&self) -> u64 {
        self.segments.iter().map(Segment::total_paid).sum()
    }
}

impl fmt::Display for MortgageSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} euro", self.label, with_thousands(self.total_amount))?;
        writeln!(f, "Total burden: {} euro", with_thousands(self.total_burden))?;
        writeln!(f, "Monthly fees:")?;
        for segment in &self.segments {
            writeln!(f, "- {} months: {} euro's", segment.months, segment.payment)?;
        }
        Ok(())
    }
}

/// Format an integer with `,` as thousands separator
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
